//! Player actor changeform schema.
//!
//! The payload of the player's `NPC_` changeform is a sequence of optional
//! field groups. A group is present exactly when its change-flag bit is set,
//! and groups always appear in ascending bit order. Decoding walks the group
//! table, invoking each present group's decoder on the bytes that follow the
//! previous one.

mod face;
mod groups;

pub use face::{Appearance, BodyWeight, Morph, Rgba, SkyrimMorph, TintLayer, TINT_LAYER_SIZE};
pub use groups::{
    ActorBaseData, AiData, Attributes, FactionRank, FormFlags, RaceChange, Skills, SpellList,
    SKILL_COUNT,
};

use visage_common::{vsval, BinaryReader, BinaryWriter, RefId, WString};
use visage_save::{Flavor, SaveHeader, Sex};

use crate::flags::ChangeFlags;
use crate::{Error, Result};

/// Group kinds of the player actor payload, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GroupKind {
    FormFlags,
    BaseData,
    Attributes,
    AiData,
    SpellList,
    FullName,
    Factions,
    Skills,
    Class,
    Face,
    DefaultOutfit,
    SleepOutfit,
    Gender,
    Race,
}

/// Group table shared by both games.
const GROUP_TABLE: [GroupKind; 14] = [
    GroupKind::FormFlags,
    GroupKind::BaseData,
    GroupKind::Attributes,
    GroupKind::AiData,
    GroupKind::SpellList,
    GroupKind::FullName,
    GroupKind::Factions,
    GroupKind::Skills,
    GroupKind::Class,
    GroupKind::Face,
    GroupKind::DefaultOutfit,
    GroupKind::SleepOutfit,
    GroupKind::Gender,
    GroupKind::Race,
];

/// Group table of a game, in ascending bit order.
pub fn schema(flavor: Flavor) -> &'static [GroupKind] {
    match flavor {
        Flavor::SkyrimSe | Flavor::Fallout4 => &GROUP_TABLE,
    }
}

/// Union of the change-flag bits a game's schema describes.
pub fn known_flags(flavor: Flavor) -> ChangeFlags {
    schema(flavor)
        .iter()
        .fold(ChangeFlags::EMPTY, |flags, kind| flags.with(kind.bit()))
}

impl GroupKind {
    /// Change-flag bit announcing the group.
    pub const fn bit(&self) -> u8 {
        match self {
            GroupKind::FormFlags => 0,
            GroupKind::BaseData => 1,
            GroupKind::Attributes => 2,
            GroupKind::AiData => 3,
            GroupKind::SpellList => 4,
            GroupKind::FullName => 5,
            GroupKind::Factions => 6,
            GroupKind::Skills => 9,
            GroupKind::Class => 10,
            GroupKind::Face => 11,
            GroupKind::DefaultOutfit => 24,
            GroupKind::SleepOutfit => 25,
            GroupKind::Gender => 26,
            GroupKind::Race => 27,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            GroupKind::FormFlags => "form flags",
            GroupKind::BaseData => "base data",
            GroupKind::Attributes => "attributes",
            GroupKind::AiData => "AI data",
            GroupKind::SpellList => "spell list",
            GroupKind::FullName => "full name",
            GroupKind::Factions => "factions",
            GroupKind::Skills => "skills",
            GroupKind::Class => "class",
            GroupKind::Face => "face",
            GroupKind::DefaultOutfit => "default outfit",
            GroupKind::SleepOutfit => "sleep outfit",
            GroupKind::Gender => "gender",
            GroupKind::Race => "race",
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One decoded field group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldGroup {
    FormFlags(FormFlags),
    BaseData(ActorBaseData),
    Attributes(Attributes),
    AiData(AiData),
    SpellList(SpellList),
    FullName(WString),
    Factions(Vec<FactionRank>),
    Skills(Skills),
    Class(RefId),
    Face(Appearance),
    DefaultOutfit(RefId),
    SleepOutfit(RefId),
    Gender(u8),
    Race(RaceChange),
}

impl FieldGroup {
    pub fn kind(&self) -> GroupKind {
        match self {
            FieldGroup::FormFlags(_) => GroupKind::FormFlags,
            FieldGroup::BaseData(_) => GroupKind::BaseData,
            FieldGroup::Attributes(_) => GroupKind::Attributes,
            FieldGroup::AiData(_) => GroupKind::AiData,
            FieldGroup::SpellList(_) => GroupKind::SpellList,
            FieldGroup::FullName(_) => GroupKind::FullName,
            FieldGroup::Factions(_) => GroupKind::Factions,
            FieldGroup::Skills(_) => GroupKind::Skills,
            FieldGroup::Class(_) => GroupKind::Class,
            FieldGroup::Face(_) => GroupKind::Face,
            FieldGroup::DefaultOutfit(_) => GroupKind::DefaultOutfit,
            FieldGroup::SleepOutfit(_) => GroupKind::SleepOutfit,
            FieldGroup::Gender(_) => GroupKind::Gender,
            FieldGroup::Race(_) => GroupKind::Race,
        }
    }

    fn read(
        kind: GroupKind,
        reader: &mut BinaryReader<'_>,
        flavor: Flavor,
    ) -> visage_common::Result<Self> {
        Ok(match kind {
            GroupKind::FormFlags => FieldGroup::FormFlags(FormFlags::read(reader)?),
            GroupKind::BaseData => FieldGroup::BaseData(reader.read_struct()?),
            GroupKind::Attributes => FieldGroup::Attributes(reader.read_struct()?),
            GroupKind::AiData => FieldGroup::AiData(reader.read_struct()?),
            GroupKind::SpellList => FieldGroup::SpellList(SpellList::read(reader)?),
            GroupKind::FullName => FieldGroup::FullName(reader.read_wstring()?),
            GroupKind::Factions => FieldGroup::Factions(FactionRank::read_list(reader)?),
            GroupKind::Skills => FieldGroup::Skills(reader.read_struct()?),
            GroupKind::Class => FieldGroup::Class(reader.read_ref_id()?),
            GroupKind::Face => FieldGroup::Face(Appearance::read(reader, flavor)?),
            GroupKind::DefaultOutfit => FieldGroup::DefaultOutfit(reader.read_ref_id()?),
            GroupKind::SleepOutfit => FieldGroup::SleepOutfit(reader.read_ref_id()?),
            GroupKind::Gender => FieldGroup::Gender(reader.read_u8()?),
            GroupKind::Race => FieldGroup::Race(RaceChange::read(reader)?),
        })
    }

    fn write(&self, writer: &mut BinaryWriter, flavor: Flavor) -> visage_common::Result<()> {
        match self {
            FieldGroup::FormFlags(value) => value.write(writer),
            FieldGroup::BaseData(value) => writer.write_struct(value),
            FieldGroup::Attributes(value) => writer.write_struct(value),
            FieldGroup::AiData(value) => writer.write_struct(value),
            FieldGroup::SpellList(value) => value.write(writer)?,
            FieldGroup::FullName(value) => writer.write_wstring(value)?,
            FieldGroup::Factions(value) => FactionRank::write_list(writer, value)?,
            FieldGroup::Skills(value) => writer.write_struct(value),
            FieldGroup::Class(value)
            | FieldGroup::DefaultOutfit(value)
            | FieldGroup::SleepOutfit(value) => writer.write_ref_id(*value),
            FieldGroup::Face(value) => value.write(writer, flavor)?,
            FieldGroup::Gender(value) => writer.write_u8(*value),
            FieldGroup::Race(value) => value.write(writer),
        }
        Ok(())
    }
}

/// Race and sex of the player, taken from the save header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerIdentity {
    pub race: WString,
    pub sex: Sex,
}

impl PlayerIdentity {
    pub fn new(race: impl Into<WString>, sex: Sex) -> Self {
        Self {
            race: race.into(),
            sex,
        }
    }

    pub fn from_header(header: &SaveHeader) -> Self {
        Self {
            race: header.race_editor_id.clone(),
            sex: header.sex,
        }
    }
}

/// Decoded player actor changeform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerActorData {
    identity: PlayerIdentity,
    /// Present groups in ascending bit order.
    groups: Vec<FieldGroup>,
}

impl PlayerActorData {
    /// Build from groups in any order.
    pub fn new(identity: PlayerIdentity, mut groups: Vec<FieldGroup>) -> Result<Self> {
        groups.sort_by_key(|g| g.kind().bit());
        if let Some(pair) = groups.windows(2).find(|w| w[0].kind() == w[1].kind()) {
            return Err(Error::UnsupportedSchema(format!(
                "{} group given twice",
                pair[0].kind()
            )));
        }
        Ok(Self { identity, groups })
    }

    /// Decode a payload whose present groups are announced by `flags`.
    pub fn decode(
        payload: &[u8],
        flags: ChangeFlags,
        flavor: Flavor,
        identity: PlayerIdentity,
    ) -> Result<Self> {
        check_known(flags, flavor)?;

        let mut reader = BinaryReader::new(payload);
        let mut groups = Vec::new();

        for &kind in schema(flavor) {
            if !flags.contains(kind.bit()) {
                continue;
            }
            let group = FieldGroup::read(kind, &mut reader, flavor)
                .map_err(|e| group_error(kind, e))?;
            groups.push(group);
        }

        if !reader.is_empty() {
            return Err(Error::UnsupportedSchema(format!(
                "{} bytes left after the last group (flags {})",
                reader.remaining(),
                flags
            )));
        }

        tracing::debug!(%flags, groups = groups.len(), bytes = payload.len(), "decoded player actor");
        Ok(Self { identity, groups })
    }

    /// Encode the groups announced by `flags`.
    ///
    /// `flags` must name exactly the present groups.
    pub fn encode(&self, flags: ChangeFlags, flavor: Flavor) -> Result<Vec<u8>> {
        check_known(flags, flavor)?;

        let mut writer = BinaryWriter::new();
        for &kind in schema(flavor) {
            match (flags.contains(kind.bit()), self.group(kind)) {
                (true, Some(group)) => group.write(&mut writer, flavor)?,
                (true, None) => {
                    return Err(Error::UnsupportedSchema(format!(
                        "flag bit {} set but no {} group",
                        kind.bit(),
                        kind
                    )))
                }
                (false, Some(_)) => {
                    return Err(Error::UnsupportedSchema(format!(
                        "{} group present but flag bit {} clear",
                        kind,
                        kind.bit()
                    )))
                }
                (false, None) => {}
            }
        }
        Ok(writer.into_inner())
    }

    /// Flags announcing exactly the present groups.
    pub fn flags(&self) -> ChangeFlags {
        self.groups
            .iter()
            .fold(ChangeFlags::EMPTY, |flags, g| flags.with(g.kind().bit()))
    }

    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn group(&self, kind: GroupKind) -> Option<&FieldGroup> {
        self.groups.iter().find(|g| g.kind() == kind)
    }

    pub fn face(&self) -> Option<&Appearance> {
        match self.group(GroupKind::Face) {
            Some(FieldGroup::Face(face)) => Some(face),
            _ => None,
        }
    }

    /// Replace or insert the face group, keeping bit order.
    pub fn set_face(&mut self, face: Appearance) {
        let bit = GroupKind::Face.bit();
        match self.groups.binary_search_by_key(&bit, |g| g.kind().bit()) {
            Ok(index) => self.groups[index] = FieldGroup::Face(face),
            Err(index) => self.groups.insert(index, FieldGroup::Face(face)),
        }
    }
}

fn check_known(flags: ChangeFlags, flavor: Flavor) -> Result<()> {
    let unknown = flags.raw() & !known_flags(flavor).raw();
    if unknown != 0 {
        return Err(Error::UnsupportedSchema(format!(
            "change flag bits {:#010x} are not described for {}",
            unknown, flavor
        )));
    }
    Ok(())
}

fn group_error(kind: GroupKind, error: visage_common::Error) -> Error {
    match error {
        visage_common::Error::UnexpectedEof { needed, available } => Error::TruncatedPayload {
            group: kind.name(),
            needed,
            available,
        },
        other => Error::UnsupportedSchema(format!("{} group: {}", kind, other)),
    }
}

/// Fail with an EOF error unless `count` entries of at least `entry_size`
/// bytes can still be read.
pub(crate) fn reserve(
    reader: &BinaryReader<'_>,
    count: usize,
    entry_size: usize,
) -> visage_common::Result<()> {
    let needed = count.saturating_mul(entry_size);
    if needed > reader.remaining() {
        return Err(visage_common::Error::UnexpectedEof {
            needed,
            available: reader.remaining(),
        });
    }
    Ok(())
}

/// Read a vsval list count.
///
/// Counts are re-encoded at their narrowest width, so a count stored wider
/// than its value needs is refused.
pub(crate) fn read_count(reader: &mut BinaryReader<'_>) -> visage_common::Result<usize> {
    let start = reader.position();
    let count = reader.read_vsval()?;
    let stored = reader.position() - start;
    let narrowest = vsval::encoded_len(count);
    if stored != narrowest {
        return Err(visage_common::Error::ExpectedValue {
            expected: format!("count {} in {} byte(s)", count, narrowest),
            actual: format!("{} bytes", stored),
        });
    }
    Ok(count as usize)
}
