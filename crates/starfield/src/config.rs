//! # Configuration
//!
//! A field is described by one TOML document:
//!
//! ```toml
//! [galaxy]
//! count = 1000
//! radius = 5.0
//! branches = 3
//! spin = 1.0
//! randomness = 0.2
//! randomness_power = 3.0
//! inside_color = "#ff6030"
//! outside_color = "#1b3984"
//!
//! [generator]
//! variant = "spin"      # or "shader"
//! seed = 42             # omit for a different galaxy every run
//! color_space = "raw"   # or "srgb_to_linear"
//!
//! [style]
//! size = 0.02
//! ```
//!
//! `[generator]`, `[style]` and `[bounds]` may be omitted. Colors are stored
//! as written; the color space is applied when parameters are resolved.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use starfield_procedural::{
    ColorSpace, FieldSeed, GalaxyGenerator, GalaxyVariant, GenerationParameters, ParameterBounds,
    PointStyle,
};

use crate::error::{ConfigError, ConfigResult};

/// Which generator runs and how its randomness is sourced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Galaxy variant.
    pub variant: GalaxyVariant,
    /// Fixed seed; `None` draws from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<FieldSeed>,
    /// How the hex colors of `[galaxy]` are interpreted.
    pub color_space: ColorSpace,
}

/// A complete field description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StarfieldConfig {
    /// Generation parameters.
    pub galaxy: GenerationParameters,
    /// Generator selection.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Render hints.
    #[serde(default)]
    pub style: PointStyle,
    /// Editing bounds the parameters are clamped to.
    #[serde(default, skip_serializing_if = "is_default_bounds")]
    pub bounds: ParameterBounds,
}

fn is_default_bounds(bounds: &ParameterBounds) -> bool {
    *bounds == ParameterBounds::default()
}

impl StarfieldConfig {
    /// The spin-galaxy lesson: 1000 points, color management off.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            galaxy: GenerationParameters::classic(),
            generator: GeneratorConfig::default(),
            style: PointStyle::default(),
            bounds: ParameterBounds::default(),
        }
    }

    /// The shader-galaxy lesson: 200 000 points sized in pixels, sRGB colors.
    #[must_use]
    pub fn shader() -> Self {
        Self {
            galaxy: GenerationParameters::shader(),
            generator: GeneratorConfig {
                variant: GalaxyVariant::Shader,
                seed: None,
                color_space: ColorSpace::SrgbToLinear,
            },
            style: PointStyle {
                size: 20.0,
                ..PointStyle::default()
            },
            bounds: ParameterBounds::default(),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed documents (including bad hex
    /// colors), [`ConfigError::Invalid`] when the parameters can never
    /// generate.
    pub fn from_toml_str(document: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(document)?;
        config.resolved_parameters().validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`StarfieldConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_toml_str(&document)?;
        tracing::debug!(path = %path.display(), variant = config.generator.variant.name(), "configuration loaded");
        Ok(config)
    }

    /// Renders the configuration as a TOML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Render`] when a value has no TOML form (a seed above
    /// `i64::MAX`).
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parameters as the generator should see them: colors converted to the
    /// configured color space, numbers clamped to `bounds`.
    #[must_use]
    pub fn resolved_parameters(&self) -> GenerationParameters {
        let space = self.generator.color_space;
        GenerationParameters {
            inside_color: self.galaxy.inside_color.convert(space),
            outside_color: self.galaxy.outside_color.convert(space),
            ..self.galaxy.clamped(&self.bounds)
        }
    }

    /// Builds the generator described by this configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when the resolved parameters are rejected.
    pub fn generator(&self) -> ConfigResult<GalaxyGenerator> {
        Ok(GalaxyGenerator::new(self.resolved_parameters(), self.generator.variant)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_procedural::Rgb;

    #[test]
    fn test_minimal_document_uses_defaults() {
        let config = StarfieldConfig::from_toml_str(
            r##"
            [galaxy]
            count = 500
            radius = 4.0
            branches = 4
            inside_color = "#ffffff"
            outside_color = "#000000"
            "##,
        )
        .unwrap();

        assert_eq!(config.galaxy.count, 500);
        assert_eq!(config.galaxy.spin, 0.0);
        assert_eq!(config.galaxy.randomness_power, 1.0);
        assert_eq!(config.generator, GeneratorConfig::default());
        assert_eq!(config.style, PointStyle::default());
        assert_eq!(config.bounds, ParameterBounds::default());
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let err = StarfieldConfig::from_toml_str(
            r##"
            [galaxy]
            count = 10
            radius = 1.0
            branches = 2
            inside_color = "#ff60"
            outside_color = "#000000"
            "##,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let mut config = StarfieldConfig::classic();
        config.bounds.radius.min = -1.0;
        config.galaxy.radius = -1.0;
        let document = config.to_toml_string().unwrap();

        let err = StarfieldConfig::from_toml_str(&document).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_resolved_parameters_clamp_and_convert() {
        let mut config = StarfieldConfig::shader();
        config.galaxy.branches = 50;
        config.galaxy.inside_color = Rgb::WHITE;

        let resolved = config.resolved_parameters();
        assert_eq!(resolved.branches, 20);
        assert_eq!(resolved.inside_color, Rgb::WHITE.convert(ColorSpace::SrgbToLinear));
        assert!(resolved.outside_color.b < config.galaxy.outside_color.b);
        // Stored parameters stay as written.
        assert_eq!(config.galaxy.branches, 50);
    }

    #[test]
    fn test_presets_survive_toml() {
        for preset in [StarfieldConfig::classic(), StarfieldConfig::shader()] {
            let document = preset.to_toml_string().unwrap();
            assert!(!document.contains("[bounds"), "default bounds are omitted");
            assert_eq!(StarfieldConfig::from_toml_str(&document).unwrap(), preset);
        }
    }

    #[test]
    fn test_seed_is_read() {
        let config = StarfieldConfig::from_toml_str(
            r##"
            [galaxy]
            count = 100
            radius = 5.0
            branches = 3
            inside_color = "#ff6030"
            outside_color = "#1b3984"

            [generator]
            variant = "shader"
            seed = 7
            "##,
        )
        .unwrap();
        assert_eq!(config.generator.variant, GalaxyVariant::Shader);
        assert_eq!(config.generator.seed, Some(FieldSeed::new(7)));
    }
}
