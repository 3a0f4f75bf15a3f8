//! # STARFIELD Core
//!
//! Everything between a parameter edit and a field on screen.
//!
//! ## Core Components
//!
//! - `ParameterEditor`: live-mutable parameters that announce settled batches
//! - `FieldController`: owns the installed field and its renderer handle
//! - `BackgroundGenerator`: off-thread generation where the newest request wins
//!
//! ## Regeneration Loop
//!
//! ```rust,ignore
//! use starfield_core::{FieldController, ParameterEditor};
//!
//! let events = editor.subscribe();
//! editor.edit(|p| p.branches = 5);
//! editor.finish_change();
//!
//! while let Ok(event) = events.try_recv() {
//!     controller.handle_event(&event, &mut rng)?;
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod controller;
pub mod error;
pub mod events;
pub mod sync;

pub use controller::{ControllerStats, FieldController, RenderResources};
pub use error::{ControllerError, ControllerResult};
pub use events::{ParameterEditor, ParameterEvent};
pub use sync::{BackgroundGenerator, CompletedField, LatestSlot, RequestId};
