//! Changeforms of Skyrim SE and Fallout 4 saves.
//!
//! A save's changeform region is a flat list of records, each describing how
//! one form differs from its plugin definition. This crate reads that list,
//! decodes the player's actor record into typed field groups and merges the
//! face of one player into another.
//!
//! # Record Format
//!
//! - 3 bytes: RefID (big-endian, top two bits are the kind)
//! - 4 bytes: change flags
//! - 1 byte: form type (low 6 bits) and length width (high 2 bits)
//! - 1 byte: version
//! - 2 × width: stored length, uncompressed length (0 when stored)
//! - stored length bytes: payload, zlib-compressed when the second length is set
//!
//! # Example
//!
//! ```no_run
//! use visage_changeform::{ChangeformTable, PlayerActorData, PlayerIdentity};
//! use visage_save::SaveFile;
//!
//! let save = SaveFile::open("Save 12 - Lydia.ess")?;
//! let (region, count) = save.changeform_region()?;
//! let table = ChangeformTable::decode(region, count)?;
//!
//! let record = &table.records()[table.find_player(save.flavor())?];
//! let player = PlayerActorData::decode(
//!     &record.payload()?,
//!     record.flags(),
//!     save.flavor(),
//!     PlayerIdentity::from_header(save.header()),
//! )?;
//! if let Some(face) = player.face() {
//!     println!("{} morphs, {} tints", face.morphs.len(), face.tints.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod actor;
mod error;
mod flags;
mod merge;
mod record;
mod table;

pub use actor::{Appearance, FieldGroup, GroupKind, PlayerActorData, PlayerIdentity};
pub use error::{Error, Result};
pub use flags::ChangeFlags;
pub use merge::{merge, MergeError, Side};
pub use record::{ChangeformRecord, LengthWidth};
pub use table::{npc_form_type, player_ref_id, ChangeformTable, PLAYER_FORM_ID};
