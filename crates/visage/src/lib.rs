//! Visage - face transfer between Skyrim SE and Fallout 4 saves.
//!
//! This crate ties the Visage library crates into one workflow: copy the
//! player's face from one save into another save of the same game, race and
//! sex, keeping the original target as a numbered backup.
//!
//! # Crates
//!
//! - [`visage_common`] - Binary reading and writing, RefIDs, strings
//! - [`visage_save`] - Save file codec (`.ess`, `.fos`)
//! - [`visage_changeform`] - Changeform table, player actor schema, face merge
//!
//! # Example
//!
//! ```no_run
//! use visage::prelude::*;
//!
//! let summary = SaveSummary::from_save(&SaveFile::open("Save 1 - Lydia.ess")?);
//! println!("{} ({}, {})", summary.name, summary.race, summary.playing_time);
//!
//! let report = transfer_face("Save 1 - Lydia.ess", "Save 9 - Lydia.ess")?;
//! println!("original kept at {}", report.backup.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod player;
mod transfer;
mod verify;

pub mod backup;
pub mod preview;
pub mod save_dir;
pub mod summary;

pub use visage_changeform as changeform;
pub use visage_common as common;
pub use visage_save as save;

pub use error::{ErrorKind, Result, TransferError};
pub use player::PlayerRecord;
pub use transfer::{rebuild_with_face, transfer_face, TransferReport};
pub use verify::{verify_file, verify_save, VerifyReport};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::preview::preview_image;
    pub use crate::save_dir::default_save_dir;
    pub use crate::summary::{format_playing_time, SaveSummary};
    pub use crate::{transfer_face, ErrorKind, TransferError, TransferReport};
    pub use visage_changeform::{
        Appearance, ChangeFlags, ChangeformTable, PlayerActorData, PlayerIdentity,
    };
    pub use visage_save::{Flavor, SaveFile, Sex};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
