//! Error types for quanta-registry.

use quanta_core::Identity;
use thiserror::Error;

use crate::detector::DetectorId;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur in registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No detector has the given id.
    #[error("detector not found: {0}")]
    NotFound(DetectorId),

    /// Caller does not own the detector.
    #[error("caller {caller} is not authorized for detector {detector}")]
    NotAuthorized {
        /// The detector being mutated.
        detector: DetectorId,
        /// The rejected caller.
        caller: Identity,
    },

    /// Status string is not one of the known states.
    #[error("invalid status: {0:?}")]
    InvalidStatus(String),

    /// A counter or accumulator would exceed its range.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Restored state breaks a registry invariant.
    #[error("corrupt registry state: {0}")]
    CorruptState(String),
}
