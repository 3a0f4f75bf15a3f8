//! # Galaxy Generator
//!
//! Spiral galaxies as point clouds: `branches` arms radiating from the
//! center, every point jittered off its arm and colored by how far out it
//! spawned.
//!
//! ## Variants
//!
//! Two generations of the technique exist and both are kept, because they
//! look different on purpose:
//!
//! | Variant  | Arm angle               | Jitter scale            | Extra buffers     |
//! |----------|-------------------------|-------------------------|-------------------|
//! | `Spin`   | `branch + radius*spin`  | `randomness`            | none              |
//! | `Shader` | `branch`                | `randomness * radius`   | scales, offsets   |
//!
//! The shader variant leaves spin to the consuming vertex shader, which
//! rotates points over time, so only the static disk is generated here.
//!
//! ## Draw Order
//!
//! Per point: radius, then magnitude and sign for x, y and z, then (shader
//! variant) the scale. Seeded golden tests depend on this order.

use std::f64::consts::TAU;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::GenerationResult;
use crate::field::PointField;
use crate::params::GenerationParameters;
use crate::random::RandomSource;

/// Points generated between checks of an abort request.
pub const ABORT_POLL_INTERVAL: usize = 4096;

/// Which galaxy technique to reproduce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalaxyVariant {
    /// Spin baked into positions, jitter scaled by `randomness` only.
    #[default]
    Spin,
    /// No spin, jitter scaled by `randomness * radius`, per-point scales.
    Shader,
}

impl GalaxyVariant {
    /// Stable lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spin => "spin",
            Self::Shader => "shader",
        }
    }
}

/// A validated galaxy recipe.
///
/// Construction checks the parameters once; every [`generate`] afterwards is
/// infallible and allocates exactly one field.
///
/// # Example
///
/// ```rust,ignore
/// let generator = GalaxyGenerator::new(GenerationParameters::classic(), GalaxyVariant::Spin)?;
/// let field = generator.generate(&mut FieldSeed::new(42).rng());
/// assert_eq!(field.len(), 1000);
/// ```
///
/// [`generate`]: GalaxyGenerator::generate
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyGenerator {
    params: GenerationParameters,
    variant: GalaxyVariant,
}

impl GalaxyGenerator {
    /// Validates `params` and builds a generator.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidParameter`](crate::GenerationError::InvalidParameter)
    /// when the parameters fail [`GenerationParameters::validate`].
    pub fn new(params: GenerationParameters, variant: GalaxyVariant) -> GenerationResult<Self> {
        params.validate()?;
        Ok(Self { params, variant })
    }

    /// The parameters this generator was built from.
    #[must_use]
    pub const fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// The variant this generator reproduces.
    #[must_use]
    pub const fn variant(&self) -> GalaxyVariant {
        self.variant
    }

    /// Generates a full field.
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> PointField {
        match self.generate_interruptible(rng, || false) {
            Some(field) => field,
            // never aborts
            None => unreachable!("generation without abort requests cannot be interrupted"),
        }
    }

    /// Generates a field, polling `should_abort` every
    /// [`ABORT_POLL_INTERVAL`] points.
    ///
    /// Returns `None` when aborted; the partially filled buffers are dropped.
    pub fn generate_interruptible<R, F>(&self, rng: &mut R, mut should_abort: F) -> Option<PointField>
    where
        R: RandomSource + ?Sized,
        F: FnMut() -> bool,
    {
        let started = Instant::now();
        let p = &self.params;
        let count = p.count as usize;
        let shader = self.variant == GalaxyVariant::Shader;
        let branches = f64::from(p.branches);

        let mut field = PointField::zeroed(count, shader, shader);

        for i in 0..count {
            if i % ABORT_POLL_INTERVAL == 0 && should_abort() {
                tracing::trace!(at = i, of = count, "galaxy generation aborted");
                return None;
            }

            let radius = rng.next_uniform() * p.radius;
            let branch_angle = (i % p.branches as usize) as f64 / branches * TAU;

            let jitter_scale = if shader {
                p.randomness * radius
            } else {
                p.randomness
            };
            let mut jitter = [0.0f64; 3];
            for axis in &mut jitter {
                *axis = rng.signed_power_jitter(p.randomness_power) * jitter_scale;
            }

            let angle = if shader {
                branch_angle
            } else {
                branch_angle + radius * p.spin
            };

            let position = [
                angle.cos() * radius + jitter[0],
                jitter[1],
                angle.sin() * radius + jitter[2],
            ];
            let mix = (radius / p.radius) as f32;
            let color = p.inside_color.lerp(p.outside_color, mix);

            field.write(i, position, color.to_array());
            if shader {
                field.write_offset(i, jitter);
                field.write_scale(i, rng.next_uniform());
            }
        }

        tracing::debug!(
            variant = self.variant.name(),
            count,
            elapsed_us = started.elapsed().as_micros() as u64,
            "galaxy generated"
        );
        Some(field)
    }
}

/// Validates and generates in one call.
///
/// # Errors
///
/// [`GenerationError::InvalidParameter`](crate::GenerationError::InvalidParameter)
/// when `count < 1`, `radius <= 0` or `branches < 1`. Nothing is allocated
/// in that case.
pub fn generate_galaxy<R: RandomSource + ?Sized>(
    params: &GenerationParameters,
    variant: GalaxyVariant,
    rng: &mut R,
) -> GenerationResult<PointField> {
    let generator = GalaxyGenerator::new(params.clone(), variant)?;
    Ok(generator.generate(rng))
}
