//! The fixed-order save header.

use std::fmt;

use visage_common::{BinaryReader, BinaryWriter, WString};

use crate::{Flavor, Result};

/// Player sex as stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Sex {
    Male,
    Female,
    Unknown(u16),
}

impl Sex {
    pub const MALE_RAW: u16 = 0;
    pub const FEMALE_RAW: u16 = 1;

    pub fn from_raw(raw: u16) -> Self {
        match raw {
            Self::MALE_RAW => Self::Male,
            Self::FEMALE_RAW => Self::Female,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u16 {
        match *self {
            Self::Male => Self::MALE_RAW,
            Self::Female => Self::FEMALE_RAW,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// The header block that follows the magic and header size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SaveHeader {
    pub version: u32,
    pub save_number: u32,
    pub player_name: WString,
    pub player_level: u32,
    pub player_location: WString,
    /// In-game play time text, e.g. `"012.34.56"`.
    pub game_date: WString,
    pub race_editor_id: WString,
    pub sex: Sex,
    pub current_exp: f32,
    pub level_up_exp: f32,
    /// Windows FILETIME of the save.
    pub filetime: u64,
    pub shot_width: u32,
    pub shot_height: u32,
    /// Compression type; present only for Skyrim SE version 12 and later.
    pub compression_type: Option<u16>,
    /// Header bytes past the last known field, preserved verbatim.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub trailing: Vec<u8>,
}

impl SaveHeader {
    /// Parse the header block. `data` is exactly `header_size` bytes.
    pub fn parse(data: &[u8], flavor: Flavor) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let version = reader.read_u32()?;
        let save_number = reader.read_u32()?;
        let player_name = reader.read_wstring()?;
        let player_level = reader.read_u32()?;
        let player_location = reader.read_wstring()?;
        let game_date = reader.read_wstring()?;
        let race_editor_id = reader.read_wstring()?;
        let sex = Sex::from_raw(reader.read_u16()?);
        let current_exp = reader.read_f32()?;
        let level_up_exp = reader.read_f32()?;
        let filetime = reader.read_u64()?;
        let shot_width = reader.read_u32()?;
        let shot_height = reader.read_u32()?;

        let compression_type = if flavor.has_compression_field(version) {
            Some(reader.read_u16()?)
        } else {
            None
        };

        let trailing = reader.remaining_bytes().to_vec();

        Ok(Self {
            version,
            save_number,
            player_name,
            player_level,
            player_location,
            game_date,
            race_editor_id,
            sex,
            current_exp,
            level_up_exp,
            filetime,
            shot_width,
            shot_height,
            compression_type,
            trailing,
        })
    }

    /// Serialize the header block (without the size prefix).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(128);

        writer.write_u32(self.version);
        writer.write_u32(self.save_number);
        writer.write_wstring(&self.player_name)?;
        writer.write_u32(self.player_level);
        writer.write_wstring(&self.player_location)?;
        writer.write_wstring(&self.game_date)?;
        writer.write_wstring(&self.race_editor_id)?;
        writer.write_u16(self.sex.raw());
        writer.write_f32(self.current_exp);
        writer.write_f32(self.level_up_exp);
        writer.write_u64(self.filetime);
        writer.write_u32(self.shot_width);
        writer.write_u32(self.shot_height);
        if let Some(compression_type) = self.compression_type {
            writer.write_u16(compression_type);
        }
        writer.write_bytes(&self.trailing);

        Ok(writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(compression_type: Option<u16>) -> SaveHeader {
        SaveHeader {
            version: 12,
            save_number: 42,
            player_name: WString::from("Lydia"),
            player_level: 17,
            player_location: WString::from("Whiterun"),
            game_date: WString::from("010.22.33"),
            race_editor_id: WString::from("NordRace"),
            sex: Sex::Female,
            current_exp: 12.5,
            level_up_exp: 300.0,
            filetime: 0x01D9_0000_0000_0000,
            shot_width: 4,
            shot_height: 2,
            compression_type,
            trailing: Vec::new(),
        }
    }

    #[test]
    fn test_header_bytes_parse_back() {
        let header = sample(Some(2));
        let bytes = header.to_bytes().unwrap();
        let parsed = SaveHeader::parse(&bytes, Flavor::SkyrimSe).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_fallout4_has_no_compression_field() {
        let mut header = sample(None);
        header.version = 15;
        header.trailing = vec![0xAA, 0xBB];
        let bytes = header.to_bytes().unwrap();
        let parsed = SaveHeader::parse(&bytes, Flavor::Fallout4).unwrap();
        assert_eq!(parsed.compression_type, None);
        assert_eq!(parsed.trailing, [0xAA, 0xBB]);
    }

    #[test]
    fn test_sex_raw() {
        assert_eq!(Sex::from_raw(1), Sex::Female);
        assert_eq!(Sex::from_raw(7).raw(), 7);
        assert_eq!(Sex::Unknown(7).to_string(), "Unknown (7)");
    }
}
