//! Render hints that travel with a field to the renderer.

use serde::{Deserialize, Serialize};

/// Highest device pixel ratio honored; denser screens are not worth the fill rate.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// How a field should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Base point size.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    /// Add overlapping points together instead of blending.
    pub additive_blending: bool,
    /// Device pixel ratio of the target surface.
    pub pixel_ratio: f32,
}

impl PointStyle {
    /// Size after pixel-ratio scaling, capped at [`MAX_PIXEL_RATIO`].
    #[must_use]
    pub fn effective_size(&self) -> f32 {
        self.size * self.pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
    }
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 0.02,
            size_attenuation: true,
            additive_blending: true,
            pixel_ratio: 1.0,
        }
    }
}
