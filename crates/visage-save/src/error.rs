//! Error types for save file decoding and encoding.

use thiserror::Error;

/// Errors that can occur when working with save files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] visage_common::Error),

    /// The file does not start with a known save magic.
    #[error("unrecognized save file token {0:?}")]
    UnrecognizedMagic(String),

    /// Unsupported compression type in the header.
    #[error("unsupported compression type: {0}")]
    UnsupportedCompression(u16),

    /// Decompression error.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Compression error.
    #[error("compression error: {0}")]
    Compression(String),

    /// Decompressed size mismatch.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Offsets or lengths that do not describe a consistent file.
    #[error("invalid save layout: {0}")]
    InvalidLayout(String),
}

/// Result type for save file operations.
pub type Result<T> = std::result::Result<T, Error>;
