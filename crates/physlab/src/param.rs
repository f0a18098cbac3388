//! Parameter store: named, range-checked scalar settings.
//!
//! Every simulation exposes its tunables as a flat set of named `f64`
//! values, each described by a [`ParamSpec`]. Controls in the host clamp
//! and snap user input with [`ParamSpec::clamp`] / [`ParamSpec::nudge`];
//! the store itself refuses anything outside the declared range, so
//! steppers never need to validate their inputs.

use core::fmt;

/// Errors returned when writing to a parameter store.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    /// No parameter with this name exists.
    #[error("unknown parameter `{0}`")]
    Unknown(String),

    /// The value is NaN or infinite.
    #[error("{name} must be a finite number")]
    NotFinite {
        /// Parameter name.
        name: &'static str,
    },

    /// The value lies outside the declared range.
    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Declared minimum.
        min: f64,
        /// Declared maximum.
        max: f64,
    },

    /// A counted or discrete parameter given a fractional value.
    #[error("{name} must be a whole number, got {value}")]
    NotWhole {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Machine name, used by config files and `--set`.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Display unit (may be empty).
    pub unit: &'static str,
    /// Inclusive minimum.
    pub min: f64,
    /// Inclusive maximum.
    pub max: f64,
    /// Control increment.
    pub step: f64,
    /// Value used on construction.
    pub default: f64,
    /// Names of discrete values; empty for continuous parameters.
    pub choices: &'static [&'static str],
    /// Only whole numbers are accepted.
    pub whole: bool,
}

impl ParamSpec {
    /// Declares a continuous parameter.
    pub const fn new(
        name: &'static str,
        label: &'static str,
        unit: &'static str,
        range: (f64, f64),
        step: f64,
        default: f64,
    ) -> Self {
        Self {
            name,
            label,
            unit,
            min: range.0,
            max: range.1,
            step,
            default,
            choices: &[],
            whole: false,
        }
    }

    /// Declares a parameter that counts things and only takes whole values.
    pub const fn count(
        name: &'static str,
        label: &'static str,
        range: (f64, f64),
        step: f64,
        default: f64,
    ) -> Self {
        Self {
            whole: true,
            ..Self::new(name, label, "", range, step, default)
        }
    }

    /// Declares a discrete parameter whose values are `0..choices.len()`.
    pub const fn choice(
        name: &'static str,
        label: &'static str,
        choices: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            name,
            label,
            unit: "",
            min: 0.0,
            max: (choices.len() - 1) as f64,
            step: 1.0,
            default: default as f64,
            choices,
            whole: true,
        }
    }

    /// Returns true if `value` lies within the declared range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Checks that `value` is finite, in range and, for whole-valued
    /// parameters, an integer.
    ///
    /// # Errors
    ///
    /// Returns the first rule the value breaks.
    pub fn check(&self, value: f64) -> Result<(), ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite { name: self.name });
        }
        if !self.contains(value) {
            return Err(ParamError::OutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        if self.whole && value.fract() != 0.0 {
            return Err(ParamError::NotWhole {
                name: self.name,
                value,
            });
        }
        Ok(())
    }

    /// Clamps `value` into range and snaps it to the nearest step,
    /// measured from the minimum.
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Moves `current` by `steps` increments, staying in range.
    pub fn nudge(&self, current: f64, steps: i32) -> f64 {
        self.clamp(current + f64::from(steps) * self.step)
    }

    /// Formats a value for display, naming discrete choices.
    pub fn display(&self, value: f64) -> String {
        if !self.choices.is_empty() {
            let index = value.round().max(0.0) as usize;
            return self
                .choices
                .get(index)
                .copied()
                .unwrap_or("?")
                .to_string();
        }
        let decimals = decimals_for(self.step);
        if self.unit.is_empty() {
            format!("{value:.decimals$}")
        } else {
            format!("{value:.decimals$} {}", self.unit)
        }
    }
}

fn decimals_for(step: f64) -> usize {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 4 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}

/// A flat, named set of scalar parameters.
///
/// Implementors list their specs and expose each field by name; the
/// provided [`set`](ParamSet::set) performs all validation.
pub trait ParamSet: Clone + Default + fmt::Debug + 'static {
    /// The declared parameters, in display order.
    fn specs() -> &'static [ParamSpec];

    /// Reads a parameter by name.
    fn get(&self, name: &str) -> Option<f64>;

    /// Mutable access to the storage behind a parameter name.
    fn slot(&mut self, name: &str) -> Option<&mut f64>;

    /// Looks up the spec for `name`.
    fn spec(name: &str) -> Option<&'static ParamSpec> {
        Self::specs().iter().find(|spec| spec.name == name)
    }

    /// Writes a parameter after checking that it exists and passes
    /// [`ParamSpec::check`].
    fn set(&mut self, name: &str, value: f64) -> Result<(), ParamError> {
        let spec = Self::spec(name).ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        spec.check(value)?;
        let slot = self
            .slot(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Iterates `(spec, current value)` pairs in display order.
    fn entries(&self) -> Vec<(&'static ParamSpec, f64)> {
        Self::specs()
            .iter()
            .map(|spec| (spec, self.get(spec.name).unwrap_or(spec.default)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANGLE: ParamSpec = ParamSpec::new("angle", "Angle", "deg", (0.0, 90.0), 1.0, 45.0);

    #[derive(Debug, Clone, PartialEq)]
    struct Demo {
        angle: f64,
    }

    impl Default for Demo {
        fn default() -> Self {
            Self { angle: 45.0 }
        }
    }

    impl ParamSet for Demo {
        fn specs() -> &'static [ParamSpec] {
            &[ANGLE]
        }

        fn get(&self, name: &str) -> Option<f64> {
            (name == "angle").then_some(self.angle)
        }

        fn slot(&mut self, name: &str) -> Option<&mut f64> {
            (name == "angle").then_some(&mut self.angle)
        }
    }

    #[test]
    fn test_clamp_snaps_to_step() {
        assert_eq!(ANGLE.clamp(120.0), 90.0);
        assert_eq!(ANGLE.clamp(-3.0), 0.0);
        assert_eq!(ANGLE.clamp(44.6), 45.0);
        assert_eq!(ANGLE.clamp(f64::NAN), 45.0);
    }

    #[test]
    fn test_nudge_stays_in_range() {
        assert_eq!(ANGLE.nudge(89.0, 5), 90.0);
        assert_eq!(ANGLE.nudge(1.0, -3), 0.0);
        assert_eq!(ANGLE.nudge(45.0, 1), 46.0);
    }

    #[test]
    fn test_set_validates() {
        let mut demo = Demo::default();
        assert!(demo.set("angle", 30.0).is_ok());
        assert_eq!(demo.angle, 30.0);

        assert!(matches!(
            demo.set("angle", 91.0),
            Err(ParamError::OutOfRange { name: "angle", .. })
        ));
        assert!(matches!(
            demo.set("angle", f64::INFINITY),
            Err(ParamError::NotFinite { .. })
        ));
        assert!(matches!(demo.set("nope", 1.0), Err(ParamError::Unknown(_))));
        assert_eq!(demo.angle, 30.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(ANGLE.display(45.0), "45 deg");
        let gravity = ParamSpec::new("gravity", "Gravity", "m/s²", (1.0, 20.0), 0.1, 9.8);
        assert_eq!(gravity.display(9.8), "9.8 m/s²");
        let mode = ParamSpec::choice("mode", "Mode", &["laminar", "turbulent"], 0);
        assert_eq!(mode.display(1.0), "turbulent");
        assert_eq!(mode.max, 1.0);
    }

    #[test]
    fn test_whole_values_only() {
        let mode = ParamSpec::choice("mode", "Mode", &["laminar", "turbulent", "diffusion"], 0);
        assert!(mode.check(1.0).is_ok());
        assert!(matches!(
            mode.check(0.5),
            Err(ParamError::NotWhole { name: "mode", .. })
        ));

        let particles = ParamSpec::count("particles", "Particles", (50.0, 600.0), 10.0, 300.0);
        assert!(particles.check(55.0).is_ok());
        assert!(matches!(particles.check(55.5), Err(ParamError::NotWhole { .. })));
        assert!(matches!(particles.check(700.0), Err(ParamError::OutOfRange { .. })));
        assert!(ANGLE.check(44.5).is_ok());
    }
}
