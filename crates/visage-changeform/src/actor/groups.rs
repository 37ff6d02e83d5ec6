//! Non-face field groups of the player actor.

use visage_common::{BinaryReader, BinaryWriter, FromBytes, Immutable, IntoBytes, KnownLayout, RefId};

use super::{read_count, reserve};

/// Form flags group (bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormFlags {
    pub flags: u32,
    pub unknown: u16,
}

impl FormFlags {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> visage_common::Result<Self> {
        Ok(Self {
            flags: reader.read_u32()?,
            unknown: reader.read_u16()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.flags);
        writer.write_u16(self.unknown);
    }
}

/// Actor base data (bit 1), 24 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct ActorBaseData {
    pub flags: u32,
    pub magicka_offset: i16,
    pub stamina_offset: i16,
    pub level: u16,
    pub calc_min_level: u16,
    pub calc_max_level: u16,
    pub speed_multiplier: u16,
    pub disposition_base: i16,
    pub template_flags: u16,
    pub health_offset: i16,
    pub bleedout_override: u16,
}

impl ActorBaseData {
    pub const SIZE: usize = 24;
}

/// Base attributes (bit 2).
#[derive(Debug, Clone, Copy, PartialEq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct Attributes {
    pub health: f32,
    pub magicka: f32,
    pub stamina: f32,
}

/// AI data (bit 3), 20 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct AiData {
    pub aggression: u8,
    pub confidence: u8,
    pub energy: u8,
    pub morality: u8,
    pub mood: u8,
    pub assistance: u8,
    pub aggro_flags: u8,
    pub unused: u8,
    pub warn: u32,
    pub warn_attack: u32,
    pub attack: u32,
}

impl AiData {
    pub const SIZE: usize = 20;
}

/// Number of actor skills.
pub const SKILL_COUNT: usize = 18;

/// Skill values and offsets (bit 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(C)]
pub struct Skills {
    pub values: [u8; SKILL_COUNT],
    pub offsets: [u8; SKILL_COUNT],
}

/// Spells, leveled spells and shouts (bit 4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SpellList {
    pub spells: Vec<RefId>,
    pub leveled_spells: Vec<RefId>,
    pub shouts: Vec<RefId>,
}

impl SpellList {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> visage_common::Result<Self> {
        Ok(Self {
            spells: read_ref_list(reader)?,
            leveled_spells: read_ref_list(reader)?,
            shouts: read_ref_list(reader)?,
        })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> visage_common::Result<()> {
        write_ref_list(writer, &self.spells)?;
        write_ref_list(writer, &self.leveled_spells)?;
        write_ref_list(writer, &self.shouts)
    }
}

/// A faction membership (bit 6 entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FactionRank {
    pub faction: RefId,
    pub rank: i8,
}

impl FactionRank {
    pub(crate) fn read_list(reader: &mut BinaryReader<'_>) -> visage_common::Result<Vec<Self>> {
        let count = read_count(reader)?;
        reserve(reader, count, 4)?;
        (0..count)
            .map(|_| {
                Ok(Self {
                    faction: reader.read_ref_id()?,
                    rank: reader.read_i8()?,
                })
            })
            .collect()
    }

    pub(crate) fn write_list(writer: &mut BinaryWriter, list: &[Self]) -> visage_common::Result<()> {
        writer.write_vsval_len(list.len())?;
        for entry in list {
            writer.write_ref_id(entry.faction);
            writer.write_i8(entry.rank);
        }
        Ok(())
    }
}

/// Race group (bit 27).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RaceChange {
    pub race: RefId,
    pub original_race: RefId,
}

impl RaceChange {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> visage_common::Result<Self> {
        Ok(Self {
            race: reader.read_ref_id()?,
            original_race: reader.read_ref_id()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) {
        writer.write_ref_id(self.race);
        writer.write_ref_id(self.original_race);
    }
}

fn read_ref_list(reader: &mut BinaryReader<'_>) -> visage_common::Result<Vec<RefId>> {
    let count = read_count(reader)?;
    reserve(reader, count, 3)?;
    (0..count).map(|_| reader.read_ref_id()).collect()
}

fn write_ref_list(writer: &mut BinaryWriter, list: &[RefId]) -> visage_common::Result<()> {
    writer.write_vsval_len(list.len())?;
    for id in list {
        writer.write_ref_id(*id);
    }
    Ok(())
}
