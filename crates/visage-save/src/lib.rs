//! Save file codec for Skyrim Special Edition and Fallout 4.
//!
//! This crate reads a save into a structured header, the raw screenshot and
//! the decompressed game data, and writes it back with the length fields
//! recomputed.
//!
//! # File Format
//!
//! - Magic: `TESV_SAVEGAME` or `FO4_SAVEGAME`
//! - 4 bytes: header size
//! - Header: version, save number, player name, level, location, play time,
//!   race, sex, experience, FILETIME, screenshot size and (Skyrim SE) the
//!   compression type
//! - Screenshot pixels (RGB or RGBA)
//! - Skyrim SE: uncompressed and compressed length, then the blob
//!   (stored, zlib or LZ4 block)
//! - Fallout 4: the stored blob
//!
//! The game data starts with the form version, plugin lists and the file
//! location table that points at the changeform region.
//!
//! # Example
//!
//! ```no_run
//! use visage_save::SaveFile;
//!
//! let save = SaveFile::open("Save 12 - Lydia.ess")?;
//! println!("{} ({})", save.header().player_name, save.flavor());
//!
//! let (region, count) = save.changeform_region()?;
//! println!("{} changeforms in {} bytes", count, region.len());
//!
//! std::fs::write("copy.ess", save.encode()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod body;
mod compress;
mod error;
mod file;
mod flavor;
mod header;
mod screenshot;

pub use body::{FileLocationTable, GameDataLayout};
pub use compress::{compress_zlib, decompress_zlib_sized, Compression};
pub use error::{Error, Result};
pub use file::SaveFile;
pub use flavor::Flavor;
pub use header::{SaveHeader, Sex};
pub use screenshot::Screenshot;
