//! # Controller Error Types

use starfield_procedural::GenerationError;
use thiserror::Error;

/// Errors raised while regenerating or installing fields.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The generator rejected the parameters.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The background worker thread could not be started.
    #[error("failed to spawn generator thread: {0}")]
    WorkerSpawn(String),

    /// The background worker thread has exited.
    #[error("generator thread is no longer running")]
    WorkerDisconnected,
}

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;
