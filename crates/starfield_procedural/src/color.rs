//! # Colors
//!
//! RGB triples in `[0, 1]` and the gradient mixing used by every generator.
//!
//! Colors arrive from configuration as `"#rrggbb"` strings. Whether those
//! digits are taken verbatim or decoded from sRGB into linear space depends
//! on how the consuming renderer manages color, so both are offered through
//! [`ColorSpace`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};

/// How parsed hex digits map onto linear color components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Use the digits as-is (`0xff` becomes `1.0`).
    #[default]
    Raw,
    /// Decode the digits as sRGB and convert to linear.
    SrgbToLinear,
}

/// An RGB color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from components.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a 6-digit hex color, with or without a leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidColor`] for anything that is not
    /// exactly six hex digits.
    pub fn from_hex(input: &str) -> GenerationResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        let invalid = || GenerationError::InvalidColor {
            input: input.to_string(),
        };

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let packed = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;

        Ok(Self::from_packed(packed))
    }

    /// Parses a hex color and maps it into the requested color space.
    ///
    /// # Errors
    ///
    /// Same as [`Rgb::from_hex`].
    pub fn from_hex_in(input: &str, space: ColorSpace) -> GenerationResult<Self> {
        Self::from_hex(input).map(|color| color.convert(space))
    }

    /// Builds a color from `0xRRGGBB`.
    #[inline]
    #[must_use]
    pub fn from_packed(packed: u32) -> Self {
        let channel = |shift: u32| f32::from(((packed >> shift) & 0xff) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Formats the color as `#rrggbb`, rounding each channel.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }

    /// Applies a color-space conversion.
    #[must_use]
    pub fn convert(self, space: ColorSpace) -> Self {
        match space {
            ColorSpace::Raw => self,
            ColorSpace::SrgbToLinear => self.srgb_to_linear(),
        }
    }

    /// Converts sRGB-encoded components to linear light.
    #[must_use]
    pub fn srgb_to_linear(self) -> Self {
        fn decode(c: f32) -> f32 {
            if c < 0.04045 {
                c * 0.077_399_38
            } else {
                (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
            }
        }
        Self::new(decode(self.r), decode(self.g), decode(self.b))
    }

    /// Linear interpolation toward `other`: `self + (other - self) * t`.
    ///
    /// `t` is not clamped; generators only pass values in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = GenerationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
