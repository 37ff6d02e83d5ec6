//! Synthetic save builder shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use visage::changeform::actor::{
    ActorBaseData, BodyWeight, FieldGroup, Morph, Rgba, SpellList, TintLayer,
};
use visage::changeform::{
    npc_form_type, player_ref_id, Appearance, ChangeFlags, PlayerActorData, PlayerIdentity,
};
use visage::common::{BinaryWriter, RefId, WString};
use visage::save::{compress_zlib, FileLocationTable, Flavor, SaveFile, SaveHeader, Screenshot, Sex};

/// RefIDs and payloads of the records around the player.
pub const NEIGHBOURS: [(u32, u8, &[u8]); 2] = [
    (0x400014, 1, b"actor reference data"),
    (0x000123, 0, b"object reference"),
];

pub struct SaveSpec {
    pub flavor: Flavor,
    pub compression: Option<u16>,
    pub identity: PlayerIdentity,
    pub player: Option<(ChangeFlags, Vec<u8>)>,
    pub compress_player: bool,
}

impl SaveSpec {
    pub fn new(flavor: Flavor, identity: PlayerIdentity, actor: &PlayerActorData) -> Self {
        let flags = actor.flags();
        let payload = actor.encode(flags, flavor).unwrap();
        Self {
            flavor,
            compression: match flavor {
                Flavor::SkyrimSe => Some(2),
                Flavor::Fallout4 => None,
            },
            identity,
            player: Some((flags, payload)),
            compress_player: false,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let header = header(self.flavor, self.compression, &self.identity);
        let screenshot = Screenshot::new(2, 2, 4, (0..16).collect()).unwrap();
        let base = SaveFile::logical_base(self.flavor, &header, &screenshot).unwrap();

        let (region, count) = self.region();
        let data = game_data(self.flavor, base, &region, count);
        SaveFile::from_parts(self.flavor, header, screenshot, data)
            .unwrap()
            .encode()
            .unwrap()
    }

    fn region(&self) -> (Vec<u8>, u32) {
        let mut writer = BinaryWriter::new();
        let mut count = 0;

        let (id, form_type, payload) = NEIGHBOURS[0];
        record(&mut writer, RefId::from_raw(id), 0x2, form_type, payload, false);
        count += 1;

        if let Some((flags, payload)) = &self.player {
            record(
                &mut writer,
                player_ref_id(),
                flags.raw(),
                npc_form_type(self.flavor),
                payload,
                self.compress_player,
            );
            count += 1;
        }

        let (id, form_type, payload) = NEIGHBOURS[1];
        record(&mut writer, RefId::from_raw(id), 0x1, form_type, payload, false);
        count += 1;

        (writer.into_inner(), count)
    }
}

fn record(
    writer: &mut BinaryWriter,
    id: RefId,
    flags: u32,
    form_type: u8,
    payload: &[u8],
    compress: bool,
) {
    let (stored, uncompressed_len) = if compress {
        (compress_zlib(payload).unwrap(), payload.len() as u16)
    } else {
        (payload.to_vec(), 0)
    };
    writer.write_ref_id(id);
    writer.write_u32(flags);
    writer.write_u8(form_type | (1 << 6));
    writer.write_u8(74);
    writer.write_u16(stored.len() as u16);
    writer.write_u16(uncompressed_len);
    writer.write_bytes(&stored);
}

fn header(flavor: Flavor, compression_type: Option<u16>, identity: &PlayerIdentity) -> SaveHeader {
    SaveHeader {
        version: match flavor {
            Flavor::SkyrimSe => 12,
            Flavor::Fallout4 => 15,
        },
        save_number: 7,
        player_name: WString::from("Ysolda"),
        player_level: 14,
        player_location: WString::from("Whiterun"),
        game_date: WString::from("01.22.09"),
        race_editor_id: identity.race.clone(),
        sex: identity.sex,
        current_exp: 12.5,
        level_up_exp: 300.0,
        filetime: 0x01D9_0000_0000_0000,
        shot_width: 2,
        shot_height: 2,
        compression_type,
        trailing: Vec::new(),
    }
}

fn game_data(flavor: Flavor, base: usize, region: &[u8], count: u32) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.write_u8(74);
    if flavor.has_game_version() {
        writer.write_wstring(&WString::from("1.10.163.0")).unwrap();
    }
    let plugin = WString::from("Skyrim.esm");
    writer.write_u32(1 + 2 + plugin.len() as u32);
    writer.write_u8(1);
    writer.write_wstring(&plugin).unwrap();
    if flavor.has_light_plugins(74) {
        writer.write_u16(0);
    }

    let start = (base + writer.position() + FileLocationTable::SIZE) as u32;
    let end = start + region.len() as u32;
    writer.write_struct(&FileLocationTable {
        form_id_array_count_offset: end + 4,
        unknown_table3_offset: end + 12,
        global_data_table1_offset: start,
        global_data_table2_offset: start,
        change_forms_offset: start,
        global_data_table3_offset: end,
        global_data_table1_count: 0,
        global_data_table2_count: 0,
        global_data_table3_count: 0,
        change_form_count: count,
        unused: [0; 15],
    });
    writer.write_bytes(region);
    writer.write_bytes(&[0xAB; 20]);
    writer.into_inner()
}

pub fn identity(race: &str, sex: Sex) -> PlayerIdentity {
    PlayerIdentity::new(race, sex)
}

pub fn face(flavor: Flavor, seed: u32, morphs: u32) -> Appearance {
    Appearance {
        head_parts: (0..2).map(|i| RefId::from_raw(0x400A00 + seed * 4 + i)).collect(),
        morphs: (0..morphs)
            .map(|i| {
                let key = match flavor {
                    Flavor::SkyrimSe => i,
                    Flavor::Fallout4 => 0x100 + i * 3,
                };
                Morph::new(key, seed as f32 * 0.1 + i as f32 * 0.01)
            })
            .collect(),
        tints: (0..seed as u16)
            .map(|index| TintLayer {
                index,
                color: Rgba::new(index as u8, 90, 60, 255),
                alpha: 0.75,
            })
            .collect(),
        weight: match flavor {
            Flavor::SkyrimSe => BodyWeight::Single(seed as f32),
            Flavor::Fallout4 => BodyWeight::Triangle {
                thin: 0.25,
                muscular: 0.5,
                large: 0.25,
            },
        },
    }
}

pub fn base_data(level: u16) -> ActorBaseData {
    ActorBaseData {
        flags: 0x0000_0800,
        magicka_offset: 40,
        stamina_offset: -10,
        level,
        calc_min_level: 1,
        calc_max_level: 81,
        speed_multiplier: 100,
        disposition_base: 35,
        template_flags: 0,
        health_offset: 25,
        bleedout_override: 0,
    }
}

/// Target-style actor: stats and face.
pub fn target_actor(flavor: Flavor, identity: &PlayerIdentity) -> PlayerActorData {
    PlayerActorData::new(
        identity.clone(),
        vec![
            FieldGroup::BaseData(base_data(14)),
            FieldGroup::Face(face(flavor, 1, 4)),
        ],
    )
    .unwrap()
}

/// Source-style actor: a different non-face group and a longer face.
pub fn source_actor(flavor: Flavor, identity: &PlayerIdentity) -> PlayerActorData {
    PlayerActorData::new(
        identity.clone(),
        vec![
            FieldGroup::SpellList(SpellList {
                spells: vec![RefId::from_raw(0x012FCC)],
                leveled_spells: vec![],
                shouts: vec![RefId::from_raw(0x013E07)],
            }),
            FieldGroup::Face(face(flavor, 3, 19)),
            FieldGroup::Gender(0),
        ],
    )
    .unwrap()
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
