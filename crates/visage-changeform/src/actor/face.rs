//! Face (appearance) group of the player actor.
//!
//! The face is a list of head parts, a set of morph coefficients, a list of
//! tint layers and the body weight. Skyrim SE stores the morphs as an
//! indexed array of floats named by [`SkyrimMorph`]; Fallout 4 stores
//! keyed morphs and a three-axis body weight.

use visage_common::{BinaryReader, BinaryWriter, RefId};
use visage_save::Flavor;

use super::{read_count, reserve};

/// Bytes of one tint layer on disk.
pub const TINT_LAYER_SIZE: usize = 10;

/// Named morph sliders of the Skyrim SE face (the NAM9 order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum SkyrimMorph {
    NoseLongShort = 0,
    NoseUpDown = 1,
    JawUpDown = 2,
    JawNarrowWide = 3,
    JawForwardBack = 4,
    CheeksUpDown = 5,
    CheeksForwardBack = 6,
    EyesUpDown = 7,
    EyesInOut = 8,
    BrowsUpDown = 9,
    BrowsInOut = 10,
    BrowsForwardBack = 11,
    LipsUpDown = 12,
    LipsInOut = 13,
    ChinNarrowWide = 14,
    ChinUpDown = 15,
    ChinUnderbiteOverbite = 16,
    EyesForwardBack = 17,
    Unknown = 18,
}

impl SkyrimMorph {
    /// Number of named morph slots.
    pub const COUNT: usize = 19;

    pub const fn all() -> [SkyrimMorph; Self::COUNT] {
        [
            SkyrimMorph::NoseLongShort,
            SkyrimMorph::NoseUpDown,
            SkyrimMorph::JawUpDown,
            SkyrimMorph::JawNarrowWide,
            SkyrimMorph::JawForwardBack,
            SkyrimMorph::CheeksUpDown,
            SkyrimMorph::CheeksForwardBack,
            SkyrimMorph::EyesUpDown,
            SkyrimMorph::EyesInOut,
            SkyrimMorph::BrowsUpDown,
            SkyrimMorph::BrowsInOut,
            SkyrimMorph::BrowsForwardBack,
            SkyrimMorph::LipsUpDown,
            SkyrimMorph::LipsInOut,
            SkyrimMorph::ChinNarrowWide,
            SkyrimMorph::ChinUpDown,
            SkyrimMorph::ChinUnderbiteOverbite,
            SkyrimMorph::EyesForwardBack,
            SkyrimMorph::Unknown,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            SkyrimMorph::NoseLongShort => "NoseLongShort",
            SkyrimMorph::NoseUpDown => "NoseUpDown",
            SkyrimMorph::JawUpDown => "JawUpDown",
            SkyrimMorph::JawNarrowWide => "JawNarrowWide",
            SkyrimMorph::JawForwardBack => "JawForwardBack",
            SkyrimMorph::CheeksUpDown => "CheeksUpDown",
            SkyrimMorph::CheeksForwardBack => "CheeksForwardBack",
            SkyrimMorph::EyesUpDown => "EyesUpDown",
            SkyrimMorph::EyesInOut => "EyesInOut",
            SkyrimMorph::BrowsUpDown => "BrowsUpDown",
            SkyrimMorph::BrowsInOut => "BrowsInOut",
            SkyrimMorph::BrowsForwardBack => "BrowsForwardBack",
            SkyrimMorph::LipsUpDown => "LipsUpDown",
            SkyrimMorph::LipsInOut => "LipsInOut",
            SkyrimMorph::ChinNarrowWide => "ChinNarrowWide",
            SkyrimMorph::ChinUpDown => "ChinUpDown",
            SkyrimMorph::ChinUnderbiteOverbite => "ChinUnderbiteOverbite",
            SkyrimMorph::EyesForwardBack => "EyesForwardBack",
            SkyrimMorph::Unknown => "Unknown",
        }
    }
}

impl TryFrom<u32> for SkyrimMorph {
    type Error = ();

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        SkyrimMorph::all().get(value as usize).copied().ok_or(())
    }
}

impl std::fmt::Display for SkyrimMorph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One morph coefficient.
///
/// For Skyrim SE `key` is the array index and is not stored, so the morphs
/// of a Skyrim SE face must be keyed `0..n` in order. For Fallout 4 it is the
/// stored key.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Morph {
    pub key: u32,
    pub value: f32,
}

impl Morph {
    pub fn new(key: u32, value: f32) -> Self {
        Self { key, value }
    }

    /// Slider name in a Skyrim SE save.
    pub fn skyrim_name(&self) -> Option<SkyrimMorph> {
        SkyrimMorph::try_from(self.key).ok()
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A face tint layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TintLayer {
    pub index: u16,
    pub color: Rgba,
    pub alpha: f32,
}

impl TintLayer {
    fn read(reader: &mut BinaryReader<'_>) -> visage_common::Result<Self> {
        let index = reader.read_u16()?;
        let [r, g, b, a] = reader.read_array::<4>()?;
        let alpha = reader.read_f32()?;
        Ok(Self {
            index,
            color: Rgba::new(r, g, b, a),
            alpha,
        })
    }

    fn write(&self, writer: &mut BinaryWriter) {
        writer.write_u16(self.index);
        writer.write_bytes(&[self.color.r, self.color.g, self.color.b, self.color.a]);
        writer.write_f32(self.alpha);
    }
}

/// Body weight: a single slider in Skyrim SE, a triangle in Fallout 4.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BodyWeight {
    Single(f32),
    Triangle { thin: f32, muscular: f32, large: f32 },
}

/// Decoded face group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Appearance {
    pub head_parts: Vec<RefId>,
    pub morphs: Vec<Morph>,
    pub tints: Vec<TintLayer>,
    pub weight: BodyWeight,
}

impl Appearance {
    pub(crate) fn read(
        reader: &mut BinaryReader<'_>,
        flavor: Flavor,
    ) -> visage_common::Result<Self> {
        let count = read_count(reader)?;
        reserve(reader, count, 3)?;
        let head_parts = (0..count)
            .map(|_| reader.read_ref_id())
            .collect::<visage_common::Result<Vec<_>>>()?;

        let morphs = match flavor {
            Flavor::SkyrimSe => {
                let count = reader.read_u32()? as usize;
                reserve(reader, count, 4)?;
                (0..count)
                    .map(|i| Ok(Morph::new(i as u32, reader.read_f32()?)))
                    .collect::<visage_common::Result<Vec<_>>>()?
            }
            Flavor::Fallout4 => {
                let count = reader.read_u32()? as usize;
                reserve(reader, count, 8)?;
                (0..count)
                    .map(|_| Ok(Morph::new(reader.read_u32()?, reader.read_f32()?)))
                    .collect::<visage_common::Result<Vec<_>>>()?
            }
        };

        let count = match flavor {
            Flavor::SkyrimSe => read_count(reader)?,
            Flavor::Fallout4 => reader.read_u32()? as usize,
        };
        reserve(reader, count, TINT_LAYER_SIZE)?;
        let tints = (0..count)
            .map(|_| TintLayer::read(reader))
            .collect::<visage_common::Result<Vec<_>>>()?;

        let weight = match flavor {
            Flavor::SkyrimSe => BodyWeight::Single(reader.read_f32()?),
            Flavor::Fallout4 => BodyWeight::Triangle {
                thin: reader.read_f32()?,
                muscular: reader.read_f32()?,
                large: reader.read_f32()?,
            },
        };

        Ok(Self {
            head_parts,
            morphs,
            tints,
            weight,
        })
    }

    pub(crate) fn write(
        &self,
        writer: &mut BinaryWriter,
        flavor: Flavor,
    ) -> visage_common::Result<()> {
        writer.write_vsval_len(self.head_parts.len())?;
        for part in &self.head_parts {
            writer.write_ref_id(*part);
        }

        writer.write_len_u32(self.morphs.len(), "morph count")?;
        for (index, morph) in self.morphs.iter().enumerate() {
            match flavor {
                Flavor::SkyrimSe if morph.key as usize != index => {
                    return Err(visage_common::Error::ExpectedValue {
                        expected: format!("morph key {}", index),
                        actual: morph.key.to_string(),
                    })
                }
                Flavor::SkyrimSe => {}
                Flavor::Fallout4 => writer.write_u32(morph.key),
            }
            writer.write_f32(morph.value);
        }

        match flavor {
            Flavor::SkyrimSe => writer.write_vsval_len(self.tints.len())?,
            Flavor::Fallout4 => writer.write_len_u32(self.tints.len(), "tint count")?,
        }
        for tint in &self.tints {
            tint.write(writer);
        }

        match (flavor, self.weight) {
            (Flavor::SkyrimSe, BodyWeight::Single(weight)) => writer.write_f32(weight),
            (
                Flavor::Fallout4,
                BodyWeight::Triangle {
                    thin,
                    muscular,
                    large,
                },
            ) => {
                writer.write_f32(thin);
                writer.write_f32(muscular);
                writer.write_f32(large);
            }
            (_, weight) => {
                return Err(visage_common::Error::ExpectedValue {
                    expected: format!("{} body weight", flavor),
                    actual: format!("{:?}", weight),
                })
            }
        }
        Ok(())
    }

    /// Encode the face group alone, as it appears inside the payload.
    pub fn to_bytes(&self, flavor: Flavor) -> crate::Result<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        self.write(&mut writer, flavor)?;
        Ok(writer.into_inner())
    }

    /// Look up a Skyrim SE morph slider.
    pub fn skyrim_morph(&self, morph: SkyrimMorph) -> Option<f32> {
        self.morphs
            .iter()
            .find(|m| m.key == morph as u32)
            .map(|m| m.value)
    }
}
