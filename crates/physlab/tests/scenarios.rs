//! End-to-end runs through the type-erased runner.

use physlab::prelude::*;
use physlab::svg;

fn readout(runner: &dyn Runner, label: &str) -> f64 {
    runner
        .readouts()
        .iter()
        .find(|r| r.label == label)
        .unwrap_or_else(|| panic!("no readout `{label}`"))
        .value
}

fn run_to_completion(runner: &mut dyn Runner, max_ticks: usize) {
    runner.start();
    for _ in 0..max_ticks {
        if !runner.tick() {
            break;
        }
    }
}

#[test]
fn textbook_projectile_launch() {
    let mut runner = SimKind::Projectile.runner();
    assert_eq!(runner.param("angle"), Some(45.0));
    assert_eq!(runner.param("velocity"), Some(20.0));
    assert_eq!(runner.param("gravity"), Some(9.8));

    run_to_completion(&mut *runner, 10_000);
    assert!(!runner.is_running(), "projectile halts on landing");

    let range = readout(&*runner, "range");
    let apex = readout(&*runner, "max height");
    assert!((range - 40.8).abs() / 40.8 < 0.05, "range {range}");
    assert!((apex - 10.2).abs() / 10.2 < 0.05, "max height {apex}");
}

#[test]
fn defaults_lie_within_declared_ranges() {
    for kind in SimKind::ALL {
        let runner = kind.runner();
        for spec in runner.param_specs() {
            assert!(spec.contains(spec.default), "{kind}.{}", spec.name);
            assert_eq!(runner.param(spec.name), Some(spec.default), "{kind}.{}", spec.name);
            if !spec.choices.is_empty() {
                assert_eq!(spec.max as usize + 1, spec.choices.len(), "{kind}.{}", spec.name);
            }
        }
    }
}

#[test]
fn every_kind_renders_after_running() {
    let viewport = Viewport::new(120, 80);
    let toggles = Toggles {
        trail: true,
        vectors: true,
        guides: true,
    };
    for kind in SimKind::ALL {
        let mut runner = kind.runner();
        runner.start();
        for _ in 0..200 {
            runner.tick();
        }
        let scene = runner.scene(&toggles, viewport);
        assert!(!scene.shapes.is_empty(), "{kind} drew nothing");

        let mut canvas = Canvas::new(viewport);
        canvas.paint(&scene);
        let painted = (0..viewport.height)
            .flat_map(|y| canvas.row(y).to_vec())
            .filter(|px| *px != THEME.background)
            .count();
        assert!(painted > 0, "{kind} painted nothing");

        let doc = svg::render(&scene, viewport);
        assert!(doc.contains("</svg>"));
        for r in runner.readouts() {
            assert!(r.value.is_finite(), "{kind}: {r}");
        }
    }
}

#[test]
fn rendering_does_not_touch_state() {
    for kind in SimKind::ALL {
        let mut runner = kind.runner();
        runner.start();
        for _ in 0..10 {
            runner.tick();
        }
        let before = runner.readouts();
        let _ = runner.scene(&Toggles::default(), Viewport::new(40, 40));
        let _ = runner.scene(&Toggles::default(), Viewport::new(400, 40));
        assert_eq!(runner.readouts(), before, "{kind}");
    }
}

#[test]
fn runners_are_independent() {
    let mut runners: Vec<Box<dyn Runner>> = SimKind::ALL.into_iter().map(SimKind::runner).collect();
    runners[1].start();
    for runner in &mut runners {
        runner.tick();
    }
    for (i, runner) in runners.iter().enumerate() {
        let expected = u64::from(i == 1);
        assert_eq!(runner.control().ticks(), expected, "{}", runner.kind());
    }
}

#[test]
fn reset_after_parameter_change_uses_new_value() {
    let mut runner = SimKind::Projectile.runner();
    runner.set_param("velocity", 10.0).unwrap();
    runner.reset();
    run_to_completion(&mut *runner, 10_000);
    let range = readout(&*runner, "range");
    let expected = 10.0 * 10.0 / 9.8;
    assert!((range - expected).abs() < 1e-2);
}

#[test]
fn fluid_mode_switch_restarts_pool() {
    let mut runner = SimKind::Fluid.runner();
    runner.start();
    for _ in 0..20 {
        runner.tick();
    }
    runner.set_param("mode", 2.0).unwrap();
    assert_eq!(runner.control().ticks(), 0);
    assert!((readout(&*runner, "particles") - 300.0).abs() < f64::EPSILON);

    runner.set_param("particles", 100.0).unwrap();
    runner.tick();
    assert!((readout(&*runner, "particles") - 100.0).abs() < f64::EPSILON);
}
