//! # STARFIELD
//!
//! Procedural galaxies for point renderers: configuration, logging and the
//! buffer files the `starfield` binary writes.
//!
//! ## Crates
//!
//! - [`starfield_procedural`]: the generators
//! - [`starfield_core`]: events, field ownership, background generation
//!
//! ## Example
//!
//! ```rust,ignore
//! use starfield::StarfieldConfig;
//!
//! let config = StarfieldConfig::from_path("presets/galaxy.toml")?;
//! let mut rng = config.generator.seed.unwrap_or_default().rng();
//! let field = config.generator()?.generate(&mut rng);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use config::{GeneratorConfig, StarfieldConfig};
pub use error::{ConfigError, ConfigResult};
pub use output::{read_f32_file, write_field};

pub use starfield_core;
pub use starfield_procedural;
