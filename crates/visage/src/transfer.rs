//! The face transfer workflow.
//!
//! Every check runs against in-memory data first. The rebuilt target is
//! decoded again and compared with what was meant to be written, and only
//! then does anything on disk change: the new bytes go to a synced temporary
//! file beside the target, the target is linked under its backup name and the
//! temporary file takes the target's place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use visage_changeform::{merge, ChangeFlags};
use visage_save::{Flavor, SaveFile};

use crate::backup::link_backup;
use crate::error::{Result, TransferError};
use crate::player::PlayerRecord;

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransferReport {
    pub game: Flavor,
    pub target: PathBuf,
    /// Where the original target bytes now live.
    pub backup: PathBuf,
    pub bytes_written: usize,
}

/// Copy the player face of `source` into `target`.
///
/// On success the original target is kept as `<target>.facebak<N>`. Any
/// validation failure leaves the target untouched and creates no backup.
pub fn transfer_face(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<TransferReport> {
    let (source, target) = (source.as_ref(), target.as_ref());

    let source_save = read_save(source)?;
    let target_save = read_save(target)?;
    let game = target_save.flavor();

    let rebuilt = rebuild_with_face(&source_save, target_save)?;
    let backup = replace_with_backup(target, &rebuilt)?;

    tracing::info!(
        target = %target.display(),
        backup = %backup.display(),
        bytes = rebuilt.len(),
        "face transferred"
    );

    Ok(TransferReport {
        game,
        target: target.to_path_buf(),
        backup,
        bytes_written: rebuilt.len(),
    })
}

/// Build the bytes of `target` carrying the face of `source`.
///
/// The target's player record must re-encode to its stored bytes. The result
/// has been decoded again and checked: the player record is found, its flags
/// equal the target's and its face equals the source's.
pub fn rebuild_with_face(source: &SaveFile, mut target: SaveFile) -> Result<Vec<u8>> {
    if source.flavor() != target.flavor() {
        return Err(TransferError::GameMismatch {
            source_game: source.flavor(),
            target_game: target.flavor(),
        });
    }
    let flavor = target.flavor();

    let donor = PlayerRecord::load(source)?;

    let (region, target_flags, expected_face, record_count) = {
        let PlayerRecord {
            mut table,
            index,
            flags,
            actor,
        } = PlayerRecord::load(&target)?;

        {
            let stored = table.records()[index].payload()?;
            if actor.encode(flags, flavor)? != stored.as_ref() {
                return Err(TransferError::Verification(
                    "target player record does not re-encode unchanged".into(),
                ));
            }
        }

        let (merged, merged_flags) = merge(&donor.actor, donor.flags, &actor, flags, flavor)?;
        let payload = merged.encode(merged_flags, flavor)?;

        let expected_face = match merged.face() {
            Some(face) => face.to_bytes(flavor)?,
            None => return Err(TransferError::Verification("merged actor lost its face".into())),
        };

        let record = table
            .get_mut(index)
            .ok_or_else(|| TransferError::Verification(format!("player index {} out of range", index)))?;
        record.set_payload(merged_flags, payload);

        (table.encode()?, merged_flags, expected_face, table.len())
    };

    target.replace_changeform_region(region)?;
    let bytes = target.encode()?;

    verify_rebuilt(&bytes, flavor, target_flags, &expected_face, record_count)?;
    tracing::debug!(bytes = bytes.len(), "rebuilt target verified");
    Ok(bytes)
}

fn verify_rebuilt(
    bytes: &[u8],
    flavor: Flavor,
    flags: ChangeFlags,
    face: &[u8],
    record_count: usize,
) -> Result<()> {
    let save = SaveFile::decode(bytes)?;
    let player = PlayerRecord::load(&save)?;

    if player.table.len() != record_count {
        return Err(TransferError::Verification(format!(
            "{} changeforms read back, {} written",
            player.table.len(),
            record_count
        )));
    }
    if player.flags != flags {
        return Err(TransferError::Verification(format!(
            "player flags {} read back, {} written",
            player.flags, flags
        )));
    }
    let written = match player.actor.face() {
        Some(appearance) => appearance.to_bytes(flavor)?,
        None => return Err(TransferError::Verification("face missing after rebuild".into())),
    };
    if written != face {
        return Err(TransferError::Verification("face differs after rebuild".into()));
    }
    Ok(())
}

fn read_save(path: &Path) -> Result<SaveFile> {
    let raw = fs::read(path).map_err(|e| TransferError::io(path, e))?;
    let save = SaveFile::decode(&raw)?;
    tracing::debug!(path = %path.display(), game = %save.flavor(), "read save");
    Ok(save)
}

/// Put `bytes` at `target`, keeping the current file under its next backup name.
fn replace_with_backup(target: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".visage")
        .tempfile_in(dir)
        .map_err(|e| TransferError::io(dir, e))?;
    staged
        .write_all(bytes)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| TransferError::io(staged.path(), e))?;

    let backup = link_backup(target).map_err(|e| TransferError::io(target, e))?;

    if let Err(e) = staged.persist(target) {
        tracing::warn!(
            target = %target.display(),
            backup = %backup.display(),
            "could not replace target; the original is kept in the backup"
        );
        return Err(TransferError::io(target, e.error));
    }
    Ok(backup)
}
