//! Error types for changeform parsing.

use thiserror::Error;
use visage_save::Flavor;

/// Errors that can occur when decoding or encoding changeforms.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] visage_common::Error),

    /// Save codec error (record compression).
    #[error("{0}")]
    Save(#[from] visage_save::Error),

    /// A changeform record that cannot be read.
    #[error("invalid changeform record: {0}")]
    InvalidRecord(String),

    /// No player actor changeform in the table.
    #[error("no player changeform found in {0} save")]
    PlayerNotFound(Flavor),

    /// More than one player actor changeform.
    #[error("found {0} player changeforms, expected one")]
    DuplicatePlayer(usize),

    /// Change flags or groups that the schema does not describe.
    #[error("unsupported player schema: {0}")]
    UnsupportedSchema(String),

    /// A group ran past the end of the payload.
    #[error("truncated payload in {group} group: needed {needed} bytes but only {available} available")]
    TruncatedPayload {
        group: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Result type for changeform operations.
pub type Result<T> = std::result::Result<T, Error>;
