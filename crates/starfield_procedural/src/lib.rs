//! # STARFIELD Procedural Generation
//!
//! Point clouds for point-rendering primitives: spiral galaxies and
//! uniform scatters, produced as flat `f32` buffers.
//!
//! ## Design Principles
//!
//! 1. **Pure**: parameters and a random source in, a fresh [`PointField`] out
//! 2. **Injected randomness**: seed a [`RandomSource`] and the field is reproducible
//! 3. **All-or-nothing**: invalid parameters fail before any allocation
//! 4. **Fast**: a million-point galaxy well under a second in release builds
//!
//! ## Core Components
//!
//! - `GalaxyGenerator`: spin and shader galaxy variants
//! - `generate_scatter`: particle boxes, columns and fireflies
//! - `PointField`: position/color/scale/offset buffers
//! - `Rgb`: hex parsing and gradient mixing
//!
//! ## Example
//!
//! ```rust,ignore
//! use starfield_procedural::{generate_galaxy, FieldSeed, GalaxyVariant, GenerationParameters};
//!
//! let params = GenerationParameters::classic();
//! let field = generate_galaxy(&params, GalaxyVariant::Spin, &mut FieldSeed::new(42).rng())?;
//!
//! assert_eq!(field.positions().len(), 3 * params.count as usize);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod error;
pub mod field;
pub mod galaxy;
pub mod params;
pub mod random;
pub mod scatter;
pub mod style;

pub use color::{ColorSpace, Rgb};
pub use error::{GenerationError, GenerationResult};
pub use field::{Bounds, PointField, PointVertex};
pub use galaxy::{generate_galaxy, GalaxyGenerator, GalaxyVariant, ABORT_POLL_INTERVAL};
pub use params::{GenerationParameters, ParameterBounds, Range};
pub use random::{entropy_rng, ConstantSource, FieldSeed, RandomSource, SequenceSource};
pub use scatter::{generate_scatter, AxisRange, ScatterColoring, ScatterParameters};
pub use style::PointStyle;
