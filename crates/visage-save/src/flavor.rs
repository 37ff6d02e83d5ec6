//! Game flavors and the format facts that depend on them.

use std::fmt;

use crate::{Error, Result};

/// Which game produced a save file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Flavor {
    /// The Elder Scrolls V: Skyrim Special Edition (`.ess`).
    SkyrimSe,
    /// Fallout 4 (`.fos`).
    Fallout4,
}

impl Flavor {
    /// Magic token at the start of Skyrim saves.
    pub const SKYRIM_MAGIC: &'static [u8] = b"TESV_SAVEGAME";

    /// Magic token at the start of Fallout 4 saves.
    pub const FALLOUT4_MAGIC: &'static [u8] = b"FO4_SAVEGAME";

    /// Get both flavors.
    pub const fn all() -> [Flavor; 2] {
        [Flavor::SkyrimSe, Flavor::Fallout4]
    }

    /// Identify the flavor from the start of a file.
    pub fn detect(data: &[u8]) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|flavor| data.starts_with(flavor.magic()))
            .ok_or_else(|| Error::UnrecognizedMagic(describe_token(data)))
    }

    /// Get the magic token.
    pub const fn magic(&self) -> &'static [u8] {
        match self {
            Flavor::SkyrimSe => Self::SKYRIM_MAGIC,
            Flavor::Fallout4 => Self::FALLOUT4_MAGIC,
        }
    }

    /// Get the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Flavor::SkyrimSe => "Skyrim Special Edition",
            Flavor::Fallout4 => "Fallout 4",
        }
    }

    /// Get the save file extension (without the dot).
    pub const fn extension(&self) -> &'static str {
        match self {
            Flavor::SkyrimSe => "ess",
            Flavor::Fallout4 => "fos",
        }
    }

    /// Whether the header carries a compression type (and the blob is framed
    /// by two length fields).
    pub const fn has_compression_field(&self, version: u32) -> bool {
        matches!(self, Flavor::SkyrimSe) && version >= 12
    }

    /// Screenshot bytes per pixel for a header version.
    pub const fn bytes_per_pixel(&self, version: u32) -> usize {
        match self {
            Flavor::SkyrimSe if version < 12 => 3,
            _ => 4,
        }
    }

    /// Whether the game data starts with a game version string.
    pub const fn has_game_version(&self) -> bool {
        matches!(self, Flavor::Fallout4)
    }

    /// Whether the game data carries a light plugin list at this form version.
    pub const fn has_light_plugins(&self, form_version: u8) -> bool {
        match self {
            Flavor::SkyrimSe => form_version >= 78,
            Flavor::Fallout4 => form_version >= 68,
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Render the leading bytes of an unknown file for an error message.
fn describe_token(data: &[u8]) -> String {
    let head = &data[..data.len().min(Flavor::SKYRIM_MAGIC.len())];
    if head.iter().all(|b| b.is_ascii_graphic()) {
        String::from_utf8_lossy(head).into_owned()
    } else {
        head.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
