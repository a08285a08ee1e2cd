//! Error types for the Labwise interpretation pipeline.
//!
//! All fallible operations return `LabResult<T>`. Structural problems with a
//! request abort the analysis; per-value problems are recorded on the result
//! and never surface here.

use thiserror::Error;

/// The unified error type for the Labwise engine and its boundary crates.
#[derive(Debug, Error)]
pub enum LabError {
    /// The request as a whole is unusable (missing age, empty lab list, ...).
    ///
    /// Raised before any classification runs; no partial result exists.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// A single lab value could not be interpreted as a finite number.
    ///
    /// The analyzer records these in `rejected_values` and keeps going.
    #[error("invalid value for test '{test}': {reason}")]
    InvalidValue { test: String, reason: String },

    /// The reference catalog or another configuration document is invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The request document could not be decoded.
    #[error("malformed request: {reason}")]
    MalformedRequest { reason: String },

    /// The structured result failed verification before leaving the engine.
    #[error("result verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// The external narrative collaborator failed.
    #[error("narrative generation failed: {reason}")]
    NarrativeFailed { reason: String },
}

impl LabError {
    /// Shorthand for a request-level validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the Labwise crates.
pub type LabResult<T> = Result<T, LabError>;
