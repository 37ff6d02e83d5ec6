//! Error type of the transfer workflow.

use std::path::PathBuf;

use thiserror::Error;
use visage_changeform::MergeError;
use visage_save::Flavor;

/// Broad category of a [`TransferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    PlayerNotFound,
    UnsupportedSchema,
    TruncatedPayload,
    GameMismatch,
    GenderMismatch,
    RaceMismatch,
    MissingAppearanceData,
    Io,
}

/// Errors raised while transferring a face.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Reading, writing or renaming a file failed.
    #[error("I/O error on {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error(transparent)]
    Save(#[from] visage_save::Error),

    #[error(transparent)]
    Changeform(#[from] visage_changeform::Error),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("saves are from different games: source is {source_game}, target is {target_game}")]
    GameMismatch {
        source_game: Flavor,
        target_game: Flavor,
    },

    /// The rebuilt save did not read back as expected.
    #[error("rebuilt save failed verification: {0}")]
    Verification(String),
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        TransferError::Io {
            path: path.into(),
            error,
        }
    }

    /// Category of the error.
    pub fn kind(&self) -> ErrorKind {
        use visage_changeform::Error as Cf;

        match self {
            TransferError::Io { .. } => ErrorKind::Io,
            TransferError::Save(visage_save::Error::Io(_)) => ErrorKind::Io,
            TransferError::Save(_) => ErrorKind::Format,
            TransferError::Changeform(error) => match error {
                Cf::PlayerNotFound(_) => ErrorKind::PlayerNotFound,
                Cf::UnsupportedSchema(_) => ErrorKind::UnsupportedSchema,
                Cf::TruncatedPayload { .. } => ErrorKind::TruncatedPayload,
                Cf::Save(visage_save::Error::Io(_)) => ErrorKind::Io,
                Cf::Common(_) | Cf::Save(_) | Cf::InvalidRecord(_) | Cf::DuplicatePlayer(_) => {
                    ErrorKind::Format
                }
            },
            TransferError::Merge(error) => match error {
                MergeError::MissingAppearanceData(_) => ErrorKind::MissingAppearanceData,
                MergeError::RaceMismatch { .. } => ErrorKind::RaceMismatch,
                MergeError::GenderMismatch { .. } => ErrorKind::GenderMismatch,
            },
            TransferError::GameMismatch { .. } => ErrorKind::GameMismatch,
            TransferError::Verification(_) => ErrorKind::Format,
        }
    }
}

/// Result type for transfer operations.
pub type Result<T> = std::result::Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;
    use visage_changeform::Side;

    #[test]
    fn test_kinds() {
        let err: TransferError = visage_save::Error::UnrecognizedMagic("XYZ".into()).into();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err: TransferError = visage_changeform::Error::PlayerNotFound(Flavor::Fallout4).into();
        assert_eq!(err.kind(), ErrorKind::PlayerNotFound);

        let err: TransferError = MergeError::MissingAppearanceData(Side::Target).into();
        assert_eq!(err.kind(), ErrorKind::MissingAppearanceData);
        assert_eq!(err.to_string(), "target save has no appearance data");

        let err = TransferError::GameMismatch {
            source_game: Flavor::SkyrimSe,
            target_game: Flavor::Fallout4,
        };
        assert_eq!(err.kind(), ErrorKind::GameMismatch);

        let err = TransferError::io(
            "a.ess",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("I/O error on a.ess"));
    }
}
