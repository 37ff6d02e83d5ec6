//! Error types for visage-common.

use thiserror::Error;

/// Common error type for Visage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Value did not match expected.
    #[error("expected value {expected}, got {actual}")]
    ExpectedValue { expected: String, actual: String },

    /// A vsval whose width tag is not 0, 1 or 2.
    #[error("invalid vsval width tag {0}")]
    InvalidVsval(u8),

    /// A value too large for the field it is written to.
    #[error("value {value} does not fit in {field}")]
    Overflow { field: &'static str, value: u64 },
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
