//! # Generation Error Types
//!
//! All errors that can occur while producing a point field.

use thiserror::Error;

/// Errors that can occur in the procedural generators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A generation parameter is outside its valid domain.
    ///
    /// Raised before any buffer is allocated, so no partial field exists.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color {input:?}: expected 6 hex digits like \"#ff6030\"")]
    InvalidColor {
        /// The rejected input.
        input: String,
    },
}

impl GenerationError {
    /// Shorthand for [`GenerationError::InvalidParameter`].
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`GenerationError::InvalidParameter`].
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
