//! # Point Fields
//!
//! The output of every generator: flat, interleaved `f32` buffers laid out
//! exactly as a point-rendering primitive wants them.
//!
//! ## Buffer Layout
//!
//! ```text
//! positions: [x0, y0, z0, x1, y1, z1, ...]   3 * len
//! colors:    [r0, g0, b0, r1, g1, b1, ...]   3 * len
//! scales:    [s0, s1, ...]                   len      (optional)
//! offsets:   [dx0, dy0, dz0, ...]            3 * len  (optional)
//! ```
//!
//! A field is immutable once built. Regenerating produces a new field; the
//! caller decides when the old one (and whatever it uploaded) goes away.

use bytemuck::{Pod, Zeroable};

/// Per-point vertex for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    /// Position (xyz).
    pub position: [f32; 3],
    /// Linear color (rgb).
    pub color: [f32; 3],
    /// Size multiplier, `1.0` when the field carries no scales.
    pub scale: f32,
}

impl PointVertex {
    /// Size of a vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Axis-aligned bounding box of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Bounds {
    /// Extent along each axis.
    #[must_use]
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Whether `point` lies inside, inclusive.
    #[must_use]
    pub fn contains(&self, point: [f32; 3]) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}

/// A generated point cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct PointField {
    positions: Vec<f32>,
    colors: Vec<f32>,
    scales: Option<Vec<f32>>,
    offsets: Option<Vec<f32>>,
}

impl PointField {
    /// Allocates zeroed buffers for `count` points.
    pub(crate) fn zeroed(count: usize, with_scales: bool, with_offsets: bool) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
            scales: with_scales.then(|| vec![0.0; count]),
            offsets: with_offsets.then(|| vec![0.0; count * 3]),
        }
    }

    /// Writes one point. `i` must be below `len()`.
    #[inline]
    pub(crate) fn write(&mut self, i: usize, position: [f64; 3], color: [f32; 3]) {
        let i3 = i * 3;
        self.positions[i3] = position[0] as f32;
        self.positions[i3 + 1] = position[1] as f32;
        self.positions[i3 + 2] = position[2] as f32;
        self.colors[i3..i3 + 3].copy_from_slice(&color);
    }

    #[inline]
    pub(crate) fn write_scale(&mut self, i: usize, scale: f64) {
        if let Some(scales) = self.scales.as_mut() {
            scales[i] = scale as f32;
        }
    }

    #[inline]
    pub(crate) fn write_offset(&mut self, i: usize, offset: [f64; 3]) {
        if let Some(offsets) = self.offsets.as_mut() {
            let i3 = i * 3;
            offsets[i3] = offset[0] as f32;
            offsets[i3 + 1] = offset[1] as f32;
            offsets[i3 + 2] = offset[2] as f32;
        }
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the field has no points. Generators never return one.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaved positions, `3 * len()` values.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Interleaved colors, `3 * len()` values.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Per-point size multipliers in `[0, 1)`, when generated.
    #[inline]
    #[must_use]
    pub fn scales(&self) -> Option<&[f32]> {
        self.scales.as_deref()
    }

    /// Per-point jitter offsets already folded into `positions`, when recorded.
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> Option<&[f32]> {
        self.offsets.as_deref()
    }

    /// Position of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.positions[i3], self.positions[i3 + 1], self.positions[i3 + 2]]
    }

    /// Color of point `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn color(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.colors[i3], self.colors[i3 + 1], self.colors[i3 + 2]]
    }

    /// Distance of point `i` from the vertical axis, `sqrt(x² + z²)`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[must_use]
    pub fn radius_xz(&self, i: usize) -> f32 {
        let [x, _, z] = self.position(i);
        x.hypot(z)
    }

    /// Positions with the recorded offsets removed.
    ///
    /// For a shader-variant galaxy this is the flat disk on the branch lines,
    /// for consumers that apply the offsets themselves. Without offsets this
    /// is a copy of `positions`.
    #[must_use]
    pub fn base_positions(&self) -> Vec<f32> {
        match &self.offsets {
            Some(offsets) => self
                .positions
                .iter()
                .zip(offsets)
                .map(|(p, o)| p - o)
                .collect(),
            None => self.positions.clone(),
        }
    }

    /// Axis-aligned bounds, `None` for an empty field.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let mut bounds = Bounds {
            min: [first[0], first[1], first[2]],
            max: [first[0], first[1], first[2]],
        };
        for p in chunks {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(p[axis]);
                bounds.max[axis] = bounds.max[axis].max(p[axis]);
            }
        }
        Some(bounds)
    }

    /// Builds the interleaved vertex buffer.
    #[must_use]
    pub fn interleaved(&self) -> Vec<PointVertex> {
        (0..self.len())
            .map(|i| PointVertex {
                position: self.position(i),
                color: self.color(i),
                scale: self.scales.as_ref().map_or(1.0, |s| s[i]),
            })
            .collect()
    }

    /// Raw native-endian bytes of a buffer, ready to upload.
    #[must_use]
    pub fn as_bytes(buffer: &[f32]) -> &[u8] {
        bytemuck::cast_slice(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointField {
        let mut field = PointField::zeroed(2, true, true);
        field.write(0, [1.0, 2.0, 3.0], [1.0, 0.0, 0.0]);
        field.write(1, [-1.0, 0.5, 4.0], [0.0, 0.0, 1.0]);
        field.write_scale(1, 0.25);
        field.write_offset(0, [0.5, 0.0, 0.0]);
        field
    }

    #[test]
    fn test_layout() {
        let field = sample();
        assert_eq!(field.len(), 2);
        assert_eq!(field.positions().len(), 6);
        assert_eq!(field.colors().len(), 6);
        assert_eq!(field.scales().map(<[f32]>::len), Some(2));
        assert_eq!(field.position(1), [-1.0, 0.5, 4.0]);
        assert_eq!(field.color(0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_bounds() {
        let bounds = sample().bounds().unwrap();
        assert_eq!(bounds.min, [-1.0, 0.5, 3.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 4.0]);
        assert_eq!(bounds.size(), [2.0, 1.5, 1.0]);
        assert!(bounds.contains([0.0, 1.0, 3.5]));
        assert!(PointField::zeroed(0, false, false).bounds().is_none());
    }

    #[test]
    fn test_base_positions_remove_offsets() {
        let base = sample().base_positions();
        assert_eq!(&base[..3], &[0.5, 2.0, 3.0]);
        assert_eq!(&base[3..], &[-1.0, 0.5, 4.0]);
    }

    #[test]
    fn test_interleaved_vertices() {
        let vertices = sample().interleaved();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].scale, 0.25);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 2 * PointVertex::SIZE);
        assert_eq!(PointVertex::SIZE, 28);
    }

    #[test]
    fn test_scale_defaults_to_one_without_scales() {
        let mut field = PointField::zeroed(1, false, false);
        field.write(0, [0.0; 3], [0.0; 3]);
        field.write_scale(0, 0.3);
        assert!(field.scales().is_none());
        assert_eq!(field.interleaved()[0].scale, 1.0);
    }

    #[test]
    fn test_as_bytes() {
        let field = sample();
        assert_eq!(PointField::as_bytes(field.positions()).len(), 24);
    }
}
