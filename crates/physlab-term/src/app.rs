//! Host state: one runner per simulation, the active tab and the controls.

use std::time::{Duration, Instant};

use physlab::{Canvas, ParamSpec, Runner, SimKind, Toggles, Viewport};
use tracing::{info, warn};

use crate::config::{Config, ConfigError};
use crate::key::Action;

/// Whether the host loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// How a sidebar line should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Section heading.
    Heading,
    /// Ordinary text.
    Normal,
    /// The selected parameter.
    Selected,
    /// Secondary text.
    Muted,
}

/// One line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Text content.
    pub text: String,
    /// Drawing style.
    pub style: LineStyle,
}

impl Line {
    fn new(text: impl Into<String>, style: LineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// The whole interactive application.
pub struct App {
    runners: Vec<Box<dyn Runner>>,
    selected: [usize; 6],
    active: SimKind,
    toggles: Toggles,
    canvas: Canvas,
    status: String,
}

impl App {
    /// Builds all six runners, applies parameter overrides and, when asked,
    /// starts the first tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut runners: Vec<Box<dyn Runner>> =
            SimKind::ALL.into_iter().map(SimKind::runner).collect();
        for (kind, name, value) in config.overrides()? {
            runners[kind.index()].set_param(&name, value)?;
        }
        // Parameters that do not reset on change still need a fresh state.
        for runner in &mut runners {
            runner.reset();
        }

        let mut app = Self {
            runners,
            selected: [0; 6],
            active: config.tab,
            toggles: config.toggles,
            canvas: Canvas::new(Viewport::new(1, 1)),
            status: String::new(),
        };
        if config.autostart {
            app.active_runner_mut().start();
        }
        info!(tab = %app.active, query = %app.active.to_query(), "app ready");
        Ok(app)
    }

    /// The tab currently shown.
    pub const fn active(&self) -> SimKind {
        self.active
    }

    /// Overlay switches.
    pub const fn toggles(&self) -> Toggles {
        self.toggles
    }

    /// Runner for the active tab.
    pub fn runner(&self) -> &dyn Runner {
        self.runners[self.active.index()].as_ref()
    }

    /// Mutable runner for the active tab.
    pub fn active_runner_mut(&mut self) -> &mut dyn Runner {
        self.runners[self.active.index()].as_mut()
    }

    /// Runner for any tab.
    pub fn runner_for(&self, kind: SimKind) -> &dyn Runner {
        self.runners[kind.index()].as_ref()
    }

    /// Index of the selected parameter on the active tab.
    pub fn selected(&self) -> usize {
        self.selected[self.active.index()]
    }

    fn selected_spec(&self) -> Option<&'static ParamSpec> {
        self.runner().param_specs().get(self.selected())
    }

    /// Last status message.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Applies one user action.
    pub fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::ToggleRun => {
                self.active_runner_mut().toggle();
                let state = if self.runner().is_running() { "running" } else { "paused" };
                self.status = format!("{} {state}", self.active.title());
            }
            Action::Reset => {
                self.active_runner_mut().reset();
                self.status = format!("{} reset", self.active.title());
            }
            Action::Nudge(steps) => self.nudge(steps),
            Action::Select(delta) => {
                let count = self.runner().param_specs().len();
                if count > 0 {
                    let slot = &mut self.selected[self.active.index()];
                    *slot = wrap(*slot, delta, count);
                }
            }
            Action::Tab(kind) => self.switch(kind),
            Action::NextTab => self.switch(SimKind::ALL[wrap(self.active.index(), 1, 6)]),
            Action::PrevTab => self.switch(SimKind::ALL[wrap(self.active.index(), -1, 6)]),
            Action::ToggleTrail => {
                self.toggles.trail = !self.toggles.trail;
                self.status = format!("trail {}", on_off(self.toggles.trail));
            }
            Action::ToggleVectors => {
                self.toggles.vectors = !self.toggles.vectors;
                self.status = format!("vectors {}", on_off(self.toggles.vectors));
            }
            Action::ToggleGuides => {
                self.toggles.guides = !self.toggles.guides;
                self.status = format!("guides {}", on_off(self.toggles.guides));
            }
        }
        Flow::Continue
    }

    fn nudge(&mut self, steps: i32) {
        let Some(spec) = self.selected_spec() else {
            return;
        };
        let current = self.runner().param(spec.name).unwrap_or(spec.default);
        let next = spec.nudge(current, steps);
        if next == current {
            return;
        }
        match self.active_runner_mut().set_param(spec.name, next) {
            Ok(()) => self.status = format!("{} = {}", spec.label, spec.display(next)),
            Err(err) => {
                warn!(%err, "parameter rejected");
                self.status = err.to_string();
            }
        }
    }

    fn switch(&mut self, kind: SimKind) {
        if kind == self.active {
            return;
        }
        self.active = kind;
        self.status = kind.to_query();
        info!(tab = %kind, query = %kind.to_query(), "tab changed");
    }

    /// Gives every runner a chance to tick. Returns whether any did.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut ticked = false;
        for runner in &mut self.runners {
            ticked |= runner.poll(now);
        }
        ticked
    }

    /// Time from `now` until the earliest running simulation is due, or
    /// `None` when nothing runs.
    pub fn due_in(&self, now: Instant) -> Option<Duration> {
        self.runners.iter().filter_map(|runner| runner.due_in(now)).min()
    }

    /// Paints the active simulation into the frame buffer at `viewport`.
    pub fn render(&mut self, viewport: Viewport) -> &Canvas {
        self.canvas.resize(viewport);
        let scene = self.runners[self.active.index()].scene(&self.toggles, viewport);
        self.canvas.paint(&scene);
        &self.canvas
    }

    /// One label per tab, with the active one marked.
    pub fn tab_bar(&self) -> String {
        SimKind::ALL
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                if kind == self.active {
                    format!("[{} {}]", i + 1, kind.title())
                } else {
                    format!(" {} {} ", i + 1, kind.title())
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parameters, readouts and run state for the side panel.
    pub fn sidebar(&self) -> Vec<Line> {
        let runner = self.runner();
        let control = runner.control();
        let mut lines = vec![
            Line::new(self.active.title(), LineStyle::Heading),
            Line::new(
                format!(
                    "{}  t={:.2}s  ticks={}",
                    if control.is_running() { "▶ running" } else { "■ paused" },
                    control.elapsed(),
                    control.ticks()
                ),
                LineStyle::Muted,
            ),
            Line::new("", LineStyle::Normal),
            Line::new("Parameters", LineStyle::Heading),
        ];

        for (i, spec) in runner.param_specs().iter().enumerate() {
            let value = runner.param(spec.name).unwrap_or(spec.default);
            let (marker, style) = if i == self.selected() {
                ("›", LineStyle::Selected)
            } else {
                (" ", LineStyle::Normal)
            };
            lines.push(Line::new(
                format!("{marker} {}: {}", spec.label, spec.display(value)),
                style,
            ));
        }

        lines.push(Line::new("", LineStyle::Normal));
        lines.push(Line::new("Readouts", LineStyle::Heading));
        for readout in runner.readouts() {
            lines.push(Line::new(format!("  {readout}"), LineStyle::Normal));
        }

        lines.push(Line::new("", LineStyle::Normal));
        lines.push(Line::new(
            format!(
                "trail {} · vectors {} · guides {}",
                on_off(self.toggles.trail),
                on_off(self.toggles.vectors),
                on_off(self.toggles.guides)
            ),
            LineStyle::Muted,
        ));
        lines
    }
}

fn wrap(index: usize, delta: i32, len: usize) -> usize {
    let len = len as i64;
    (index as i64 + i64::from(delta)).rem_euclid(len) as usize
}

const fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&Config::default()).unwrap()
    }

    #[test]
    fn app_starts_paused_on_default_tab() {
        let app = app();
        assert_eq!(app.active(), SimKind::Projectile);
        assert!(!app.runner().is_running());
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn app_autostart_runs_first_tab_only() {
        let config = Config {
            tab: SimKind::Orbit,
            autostart: true,
            ..Config::default()
        };
        let app = App::new(&config).unwrap();
        for kind in SimKind::ALL {
            assert_eq!(app.runner_for(kind).is_running(), kind == SimKind::Orbit);
        }
    }

    #[test]
    fn app_overrides_reach_state() {
        let mut config = Config::default();
        config
            .params
            .entry("projectile".into())
            .or_default()
            .insert("height".into(), 10.0);
        let app = App::new(&config).unwrap();
        let height = app
            .runner()
            .readouts()
            .into_iter()
            .find(|r| r.label == "height")
            .unwrap();
        assert!((height.value - 10.0).abs() < 1e-12);
    }

    #[test]
    fn app_rejects_bad_override() {
        let mut config = Config::default();
        config
            .params
            .entry("spring".into())
            .or_default()
            .insert("mass".into(), 100.0);
        assert!(matches!(App::new(&config), Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn app_tab_switching_wraps() {
        let mut app = app();
        app.apply(Action::PrevTab);
        assert_eq!(app.active(), SimKind::Orbit);
        app.apply(Action::NextTab);
        assert_eq!(app.active(), SimKind::Projectile);
        app.apply(Action::Tab(SimKind::Fluid));
        assert_eq!(app.active(), SimKind::Fluid);
        assert_eq!(app.status(), "?tab=fluid");
    }

    #[test]
    fn app_nudge_changes_selected_param() {
        let mut app = app();
        app.apply(Action::Select(1));
        assert_eq!(app.selected(), 1);
        app.apply(Action::Nudge(-5));
        assert_eq!(app.runner().param("angle"), Some(40.0));
        app.apply(Action::Nudge(1000));
        assert_eq!(app.runner().param("angle"), Some(90.0));
        app.apply(Action::Select(-2));
        assert_eq!(app.selected(), 4);
    }

    #[test]
    fn app_toggles() {
        let mut app = app();
        assert_eq!(app.apply(Action::ToggleVectors), Flow::Continue);
        assert!(app.toggles().vectors);
        app.apply(Action::ToggleTrail);
        assert!(!app.toggles().trail);
        assert_eq!(app.apply(Action::Quit), Flow::Quit);
    }

    #[test]
    fn app_runs_background_tabs() {
        let mut app = app();
        app.apply(Action::ToggleRun);
        app.apply(Action::Tab(SimKind::Wave));
        assert!(app.poll(Instant::now()));
        assert_eq!(app.runner_for(SimKind::Projectile).control().ticks(), 1);
        assert_eq!(app.runner().control().ticks(), 0);
    }

    #[test]
    fn app_due_in_picks_earliest_runner() {
        let mut app = app();
        let t0 = Instant::now();
        assert_eq!(app.due_in(t0), None);

        app.apply(Action::ToggleRun);
        app.apply(Action::Tab(SimKind::Fluid));
        app.apply(Action::ToggleRun);
        assert_eq!(app.due_in(t0), Some(Duration::ZERO));
        app.poll(t0);
        let projectile = app.runner_for(SimKind::Projectile).control().interval();
        let fluid = app.runner().control().interval();
        assert_eq!(app.due_in(t0), Some(projectile.min(fluid)));
    }

    #[test]
    fn app_sidebar_lists_params_and_readouts() {
        let app = app();
        let lines = app.sidebar();
        assert_eq!(lines[0].text, "Projectile");
        let selected: Vec<_> = lines
            .iter()
            .filter(|l| l.style == LineStyle::Selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].text.contains("Launch speed"));
        assert!(lines.iter().any(|l| l.text.contains("predicted range: 40.816 m")));
        assert!(app.tab_bar().contains("[1 Projectile]"));
    }

    #[test]
    fn app_render_sizes_canvas() {
        let mut app = app();
        let canvas = app.render(Viewport::new(40, 20));
        assert_eq!(canvas.viewport(), Viewport::new(40, 20));
    }
}
