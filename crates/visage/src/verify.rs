//! Read-only round-trip check of a save.

use std::path::Path;

use visage_save::{Flavor, SaveFile};

use crate::error::{Result, TransferError};
use crate::player::PlayerRecord;

/// Result of checking one save.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerifyReport {
    pub game: Flavor,
    pub changeforms: usize,
    pub player_groups: usize,
    pub has_face: bool,
}

/// Check that a save decodes and re-encodes to the same bytes, and that
/// its player record decodes and re-encodes to the same payload.
pub fn verify_save(raw: &[u8]) -> Result<VerifyReport> {
    let save = SaveFile::decode(raw)?;
    if save.encode()? != raw {
        return Err(TransferError::Verification("save does not re-encode identically".into()));
    }

    let player = PlayerRecord::load(&save)?;
    let (region, _) = save.changeform_region()?;
    if player.table.encode()? != region {
        return Err(TransferError::Verification(
            "changeform table does not re-encode identically".into(),
        ));
    }

    let record = &player.table.records()[player.index];
    if player.actor.encode(player.flags, save.flavor())? != record.payload()?.as_ref() {
        return Err(TransferError::Verification(
            "player actor does not re-encode identically".into(),
        ));
    }

    Ok(VerifyReport {
        game: save.flavor(),
        changeforms: player.table.len(),
        player_groups: player.actor.groups().len(),
        has_face: player.actor.face().is_some(),
    })
}

/// [`verify_save`] on a file.
pub fn verify_file(path: impl AsRef<Path>) -> Result<VerifyReport> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| TransferError::io(path, e))?;
    verify_save(&raw)
}
