//! # Generation Parameters
//!
//! The parameter record a debug panel edits, the ranges that panel enforces,
//! and the two presets the galaxy lessons start from.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{GenerationError, GenerationResult};

/// Inputs of the galaxy generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationParameters {
    /// Number of points.
    pub count: u32,
    /// Maximum spawn radius.
    pub radius: f64,
    /// Number of spiral arms.
    pub branches: u32,
    /// Radians of twist per unit of radius (spin variant only).
    #[serde(default)]
    pub spin: f64,
    /// Scale of the per-axis jitter.
    #[serde(default)]
    pub randomness: f64,
    /// Exponent concentrating jitter near the branch line.
    #[serde(default = "default_randomness_power")]
    pub randomness_power: f64,
    /// Color at the center.
    pub inside_color: Rgb,
    /// Color at `radius`.
    pub outside_color: Rgb,
}

fn default_randomness_power() -> f64 {
    1.0
}

impl GenerationParameters {
    /// The spin-galaxy lesson defaults.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            count: 1000,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Rgb::from_packed(0x00ff_6030),
            outside_color: Rgb::from_packed(0x001b_3984),
        }
    }

    /// The shader-galaxy lesson defaults.
    #[must_use]
    pub fn shader() -> Self {
        Self {
            count: 200_000,
            randomness: 0.5,
            ..Self::classic()
        }
    }

    /// Checks the domain of every parameter the generators divide by or
    /// allocate from.
    ///
    /// `randomness_power < 1` is accepted: it inverts the concentration bias
    /// but is not an error.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidParameter`] when `count < 1`, `radius <= 0`
    /// (or not finite), `branches < 1`, or a jitter setting is not finite or
    /// negative.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.count < 1 {
            return Err(GenerationError::invalid("count", "must be at least 1"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GenerationError::invalid(
                "radius",
                format!("must be positive and finite, got {}", self.radius),
            ));
        }
        if self.branches < 1 {
            return Err(GenerationError::invalid("branches", "must be at least 1"));
        }
        if !self.spin.is_finite() {
            return Err(GenerationError::invalid("spin", "must be finite"));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(GenerationError::invalid(
                "randomness",
                format!("must be non-negative and finite, got {}", self.randomness),
            ));
        }
        if !(self.randomness_power.is_finite() && self.randomness_power > 0.0) {
            return Err(GenerationError::invalid(
                "randomness_power",
                format!("must be positive and finite, got {}", self.randomness_power),
            ));
        }
        Ok(())
    }

    /// Clamps every field into `bounds`, snapping stepped fields to their
    /// grid. Logs each value that moved.
    #[must_use]
    pub fn clamped(&self, bounds: &ParameterBounds) -> Self {
        let clamped = Self {
            count: bounds.count.apply_u32(self.count),
            radius: bounds.radius.apply(self.radius),
            branches: bounds.branches.apply_u32(self.branches),
            spin: bounds.spin.apply(self.spin),
            randomness: bounds.randomness.apply(self.randomness),
            randomness_power: bounds.randomness_power.apply(self.randomness_power),
            inside_color: self.inside_color,
            outside_color: self.outside_color,
        };

        macro_rules! report {
            ($($field:ident),*) => {$(
                if clamped.$field != self.$field {
                    tracing::warn!(
                        field = stringify!($field),
                        from = %self.$field,
                        to = %clamped.$field,
                        "parameter clamped to editing bounds"
                    );
                }
            )*};
        }
        report!(count, radius, branches, spin, randomness, randomness_power);

        clamped
    }
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self::classic()
    }
}

/// Allowed range of one numeric parameter, with an optional step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive minimum.
    pub min: f64,
    /// Inclusive maximum.
    pub max: f64,
    /// Grid the value snaps to, measured from `min`. `0` disables snapping.
    #[serde(default)]
    pub step: f64,
}

impl Range {
    /// Creates a range.
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamps `value` into the range and snaps it to the step grid.
    ///
    /// Non-finite input collapses to `min`.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let mut v = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            v = self.min + ((v - self.min) / self.step).round() * self.step;
            v = v.clamp(self.min, self.max);
        }
        v
    }

    fn apply_u32(&self, value: u32) -> u32 {
        self.apply(f64::from(value)).round() as u32
    }
}

/// Editing ranges for every parameter, as exposed by the lessons' panels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterBounds {
    /// Point count range.
    pub count: Range,
    /// Radius range.
    pub radius: Range,
    /// Branch count range.
    pub branches: Range,
    /// Spin range.
    pub spin: Range,
    /// Randomness range.
    pub randomness: Range,
    /// Randomness power range.
    pub randomness_power: Range,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            count: Range::new(100.0, 1_000_000.0, 100.0),
            radius: Range::new(0.01, 20.0, 0.0),
            branches: Range::new(2.0, 20.0, 1.0),
            spin: Range::new(-5.0, 5.0, 0.0),
            randomness: Range::new(0.0, 2.0, 0.0),
            randomness_power: Range::new(1.0, 10.0, 0.0),
        }
    }
}
