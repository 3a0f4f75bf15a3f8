//! # Scatter Fields
//!
//! Unstructured particle clouds: points spread uniformly through a box.
//! Covers the plain particle cube, the vertical column that follows a
//! scrolling page, and hovering fireflies.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{GenerationError, GenerationResult};
use crate::field::PointField;
use crate::random::RandomSource;

/// Interval one axis is drawn from.
///
/// Ascending ranges draw `min + u * (max - min)`, covering `[min, max)`.
/// Descending ranges draw `max - u * (max - min)`, covering `(min, max]`:
/// `u = 0` lands exactly on `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Draw downward from `max`.
    #[serde(default)]
    pub descending: bool,
}

impl AxisRange {
    /// Creates an ascending range.
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            descending: false,
        }
    }

    /// Creates a range drawn downward from `max`.
    #[inline]
    #[must_use]
    pub const fn descending(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            descending: true,
        }
    }

    /// Draws one coordinate.
    #[inline]
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.descending {
            self.max - rng.next_uniform() * (self.max - self.min)
        } else {
            rng.uniform_range(self.min, self.max)
        }
    }

    /// A range of width `size` centered on zero.
    #[inline]
    #[must_use]
    pub fn centered(size: f64) -> Self {
        Self::new(-size * 0.5, size * 0.5)
    }

    fn validate(&self, name: &'static str) -> GenerationResult<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(GenerationError::invalid(name, "bounds must be finite"));
        }
        if self.max < self.min {
            return Err(GenerationError::invalid(
                name,
                format!("max {} is below min {}", self.max, self.min),
            ));
        }
        Ok(())
    }
}

/// How scatter points are colored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterColoring {
    /// Every point gets the same color.
    Solid(Rgb),
    /// Each channel of each point is drawn uniformly from `[0, 1)`.
    Random,
}

/// Inputs of [`generate_scatter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterParameters {
    /// Number of points.
    pub count: u32,
    /// X range.
    pub x: AxisRange,
    /// Y range.
    pub y: AxisRange,
    /// Z range.
    pub z: AxisRange,
    /// Coloring mode.
    pub coloring: ScatterColoring,
    /// Emit a per-point scale in `[0, 1)`.
    #[serde(default)]
    pub with_scales: bool,
}

impl ScatterParameters {
    /// A cube of side `size` centered on the origin, randomly colored.
    #[must_use]
    pub fn cube(count: u32, size: f64) -> Self {
        Self {
            count,
            x: AxisRange::centered(size),
            y: AxisRange::centered(size),
            z: AxisRange::centered(size),
            coloring: ScatterColoring::Random,
            with_scales: false,
        }
    }

    /// A tall column spanning `sections` page sections of height `spacing`,
    /// hanging down from half a section above the origin.
    #[must_use]
    pub fn column(count: u32, spacing: f64, sections: u32, color: Rgb) -> Self {
        let top = spacing * 0.5;
        Self {
            count,
            x: AxisRange::centered(10.0),
            y: AxisRange::descending(top - spacing * f64::from(sections), top),
            z: AxisRange::centered(10.0),
            coloring: ScatterColoring::Solid(color),
            with_scales: false,
        }
    }

    /// Fireflies hovering over a 4x4 patch of ground, with size variation.
    #[must_use]
    pub fn fireflies(count: u32) -> Self {
        Self {
            count,
            x: AxisRange::centered(4.0),
            y: AxisRange::new(0.3, 1.8),
            z: AxisRange::centered(4.0),
            coloring: ScatterColoring::Solid(Rgb::WHITE),
            with_scales: true,
        }
    }

    /// Checks the count and every axis range.
    ///
    /// # Errors
    ///
    /// [`GenerationError::InvalidParameter`] when `count < 1` or a range is
    /// inverted or not finite.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.count < 1 {
            return Err(GenerationError::invalid("count", "must be at least 1"));
        }
        self.x.validate("x")?;
        self.y.validate("y")?;
        self.z.validate("z")?;
        Ok(())
    }
}

/// Spreads `count` points uniformly through the box.
///
/// Draw order per point: x, y, z, then r, g, b for random coloring, then the
/// scale when requested.
///
/// # Errors
///
/// See [`ScatterParameters::validate`]. Nothing is allocated on error.
pub fn generate_scatter<R: RandomSource + ?Sized>(
    params: &ScatterParameters,
    rng: &mut R,
) -> GenerationResult<PointField> {
    params.validate()?;

    let count = params.count as usize;
    let mut field = PointField::zeroed(count, params.with_scales, false);

    for i in 0..count {
        let position = [
            params.x.sample(rng),
            params.y.sample(rng),
            params.z.sample(rng),
        ];
        let color = match params.coloring {
            ScatterColoring::Solid(color) => color.to_array(),
            ScatterColoring::Random => [
                rng.next_uniform() as f32,
                rng.next_uniform() as f32,
                rng.next_uniform() as f32,
            ],
        };
        field.write(i, position, color);
        if params.with_scales {
            field.write_scale(i, rng.next_uniform());
        }
    }

    tracing::debug!(count, "scatter generated");
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FieldSeed, SequenceSource};

    #[test]
    fn test_cube_stays_inside() {
        let params = ScatterParameters::cube(5000, 10.0);
        let field = generate_scatter(&params, &mut FieldSeed::new(3).rng()).unwrap();

        assert_eq!(field.len(), 5000);
        for v in field.positions() {
            assert!((-5.0..5.0).contains(v), "{v} outside cube");
        }
        for c in field.colors() {
            assert!((0.0..=1.0).contains(c));
        }
        assert!(field.scales().is_none());
    }

    #[test]
    fn test_column_spans_sections() {
        let params = ScatterParameters::column(200, 4.0, 3, Rgb::from_packed(0x00ff_eded));
        let field = generate_scatter(&params, &mut FieldSeed::new(8).rng()).unwrap();

        let bounds = field.bounds().unwrap();
        assert!(bounds.min[1] > -10.0);
        assert!(bounds.max[1] <= 2.0);
        assert_eq!(field.color(17), Rgb::from_packed(0x00ff_eded).to_array());
    }

    #[test]
    fn test_column_hangs_from_top() {
        let params = ScatterParameters::column(2, 4.0, 3, Rgb::WHITE);
        // x, y, z per point
        let mut source = SequenceSource::new([0.5, 0.0, 0.5, 0.5, 0.25, 0.5]);
        let field = generate_scatter(&params, &mut source).unwrap();

        assert_eq!(field.position(0)[1], 2.0, "u = 0 sits on the top edge");
        assert!((field.position(1)[1] - (2.0 - 0.25 * 12.0)).abs() < 1e-6);
    }

    #[test]
    fn test_ascending_and_descending_samples() {
        let mut source = SequenceSource::new([0.25]);
        assert!((AxisRange::new(-1.0, 3.0).sample(&mut source) - 0.0).abs() < 1e-12);
        assert!((AxisRange::descending(-1.0, 3.0).sample(&mut source) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fireflies_have_scales() {
        let field = generate_scatter(&ScatterParameters::fireflies(30), &mut FieldSeed::new(5).rng()).unwrap();

        let scales = field.scales().unwrap();
        assert_eq!(scales.len(), 30);
        assert!(scales.iter().all(|s| (0.0..1.0).contains(s)));
        for i in 0..30 {
            let y = field.position(i)[1];
            assert!((0.3..1.8).contains(&y), "firefly {i} at height {y}");
        }
    }

    #[test]
    fn test_draw_order() {
        let params = ScatterParameters {
            count: 1,
            x: AxisRange::new(0.0, 10.0),
            y: AxisRange::new(0.0, 10.0),
            z: AxisRange::new(0.0, 10.0),
            coloring: ScatterColoring::Random,
            with_scales: true,
        };
        let mut source = SequenceSource::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let field = generate_scatter(&params, &mut source).unwrap();

        let [x, y, z] = field.position(0);
        assert!((x - 1.0).abs() < 1e-6 && (y - 2.0).abs() < 1e-6 && (z - 3.0).abs() < 1e-6);
        assert_eq!(field.color(0), [0.4, 0.5, 0.6]);
        assert_eq!(field.scales().unwrap(), &[0.7]);
        assert_eq!(source.consumed(), 7);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = FieldSeed::new(0).rng();

        let empty = ScatterParameters::cube(0, 1.0);
        assert!(generate_scatter(&empty, &mut rng).unwrap_err().is_invalid_parameter());

        let inverted = ScatterParameters {
            y: AxisRange::new(1.0, -1.0),
            ..ScatterParameters::cube(10, 1.0)
        };
        assert!(matches!(
            generate_scatter(&inverted, &mut rng),
            Err(GenerationError::InvalidParameter { name: "y", .. })
        ));

        let infinite = ScatterParameters {
            x: AxisRange::new(0.0, f64::INFINITY),
            ..ScatterParameters::cube(10, 1.0)
        };
        assert!(generate_scatter(&infinite, &mut rng).is_err());
    }
}
