//! Face merge between two player actors.

use std::fmt;

use thiserror::Error;
use visage_save::{Flavor, Sex};

use crate::actor::{GroupKind, PlayerActorData};
use crate::flags::ChangeFlags;

/// Which save of a transfer an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Source => "source",
            Side::Target => "target",
        })
    }
}

/// Reasons two player actors cannot share a face.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("{0} save has no appearance data")]
    MissingAppearanceData(Side),

    #[error("race mismatch: source is {source_race}, target is {target_race}")]
    RaceMismatch {
        source_race: String,
        target_race: String,
    },

    #[error("gender mismatch: source is {source_sex}, target is {target_sex}")]
    GenderMismatch { source_sex: Sex, target_sex: Sex },
}

/// Build the target actor with the source's face.
///
/// Every check runs before anything is built. The returned actor holds every
/// target group except the face, which comes from the source; the returned
/// flags equal `target_flags`.
pub fn merge(
    source: &PlayerActorData,
    source_flags: ChangeFlags,
    target: &PlayerActorData,
    target_flags: ChangeFlags,
    flavor: Flavor,
) -> Result<(PlayerActorData, ChangeFlags), MergeError> {
    let face_bit = GroupKind::Face.bit();

    let source_face = source
        .face()
        .filter(|_| source_flags.contains(face_bit))
        .ok_or(MergeError::MissingAppearanceData(Side::Source))?;
    if !target_flags.contains(face_bit) || target.face().is_none() {
        return Err(MergeError::MissingAppearanceData(Side::Target));
    }

    let (ours, theirs) = (source.identity(), target.identity());
    if ours.race != theirs.race {
        return Err(MergeError::RaceMismatch {
            source_race: ours.race.to_string_lossy(),
            target_race: theirs.race.to_string_lossy(),
        });
    }
    if ours.sex != theirs.sex {
        return Err(MergeError::GenderMismatch {
            source_sex: ours.sex,
            target_sex: theirs.sex,
        });
    }

    let mut merged = target.clone();
    merged.set_face(source_face.clone());

    tracing::debug!(
        game = %flavor,
        flags = %target_flags,
        head_parts = source_face.head_parts.len(),
        morphs = source_face.morphs.len(),
        tints = source_face.tints.len(),
        "merged face into target actor"
    );
    Ok((merged, target_flags))
}
