//! Common utilities for Visage.
//!
//! This crate provides the primitives shared by the save-file crates:
//!
//! - [`BinaryReader`] - Zero-copy little-endian reading from byte slices
//! - [`BinaryWriter`] - The matching little-endian writer
//! - [`RefId`] - The 3-byte form reference used throughout Bethesda saves
//! - [`WString`] - Length-prefixed strings kept as raw bytes
//! - [`vsval`] - The variable-size integer encoding used for list counts

mod error;
mod reader;
mod refid;
mod wstring;
mod writer;

pub mod vsval;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use refid::{RefId, RefIdKind};
pub use wstring::WString;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
