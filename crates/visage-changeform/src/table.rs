//! The ordered changeform table.

use visage_common::{BinaryReader, BinaryWriter, RefId};
use visage_save::Flavor;

use crate::record::ChangeformRecord;
use crate::{Error, Result};

/// Base-game FormID of the player actor base (`NPC_` 0x00000007).
pub const PLAYER_FORM_ID: u32 = 0x000007;

/// Form type of actor base (`NPC_`) changeforms.
pub const fn npc_form_type(flavor: Flavor) -> u8 {
    match flavor {
        Flavor::SkyrimSe => 9,
        Flavor::Fallout4 => 14,
    }
}

/// RefID of the player's actor base changeform.
pub const fn player_ref_id() -> RefId {
    RefId::default_form(PLAYER_FORM_ID)
}

/// All changeform records of a save, in file order.
#[derive(Debug, Clone)]
pub struct ChangeformTable<'a> {
    records: Vec<ChangeformRecord<'a>>,
}

impl<'a> ChangeformTable<'a> {
    /// Decode exactly `count` records filling `region`.
    pub fn decode(region: &'a [u8], count: u32) -> Result<Self> {
        let mut reader = BinaryReader::new(region);
        let mut records = Vec::with_capacity((count as usize).min(region.len() / 11 + 1));

        for index in 0..count {
            let record = ChangeformRecord::read(&mut reader).map_err(|e| match e {
                Error::Common(inner) => Error::InvalidRecord(format!("record {}: {}", index, inner)),
                other => other,
            })?;
            records.push(record);
        }

        if !reader.is_empty() {
            return Err(Error::InvalidRecord(format!(
                "{} bytes after the last of {} records",
                reader.remaining(),
                count
            )));
        }

        tracing::debug!(records = records.len(), bytes = region.len(), "decoded changeform table");
        Ok(Self { records })
    }

    /// Encode the table, writing untouched records verbatim.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let capacity = self.records.iter().map(|r| r.raw().len()).sum::<usize>();
        let mut writer = BinaryWriter::with_capacity(capacity);
        for record in &self.records {
            record.write(&mut writer)?;
        }
        Ok(writer.into_inner())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ChangeformRecord<'a>] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ChangeformRecord<'a>> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ChangeformRecord<'a>> {
        self.records.get_mut(index)
    }

    /// Index of the player's actor base record.
    pub fn find_player(&self, flavor: Flavor) -> Result<usize> {
        let form_type = npc_form_type(flavor);
        let player = player_ref_id();

        let mut matches = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.form_type() == form_type && r.form_id() == player)
            .map(|(i, _)| i);

        let first = matches.next().ok_or(Error::PlayerNotFound(flavor))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(Error::DuplicatePlayer(extra + 1));
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::ChangeFlags;

    fn record(out: &mut BinaryWriter, id: RefId, form_type: u8, payload: &[u8]) {
        out.write_ref_id(id);
        out.write_u32(0x1);
        out.write_u8(form_type);
        out.write_u8(74);
        out.write_u8(payload.len() as u8);
        out.write_u8(0);
        out.write_bytes(payload);
    }

    fn region() -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        record(&mut writer, RefId::from_raw(0x400014), 1, b"achr");
        record(&mut writer, player_ref_id(), 9, b"player");
        record(&mut writer, RefId::from_raw(0x000123), 0, b"refr data");
        writer.into_inner()
    }

    #[test]
    fn test_scan_order_and_passthrough() {
        let bytes = region();
        let table = ChangeformTable::decode(&bytes, 3).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0).unwrap().form_type(), 1);
        assert_eq!(table.get(2).unwrap().form_id(), RefId::from_raw(0x000123));
        assert_eq!(table.encode().unwrap(), bytes);
    }

    #[test]
    fn test_find_player() {
        let bytes = region();
        let table = ChangeformTable::decode(&bytes, 3).unwrap();
        assert_eq!(table.find_player(Flavor::SkyrimSe).unwrap(), 1);
        assert!(matches!(
            table.find_player(Flavor::Fallout4),
            Err(Error::PlayerNotFound(Flavor::Fallout4))
        ));
    }

    #[test]
    fn test_duplicate_player() {
        let mut bytes = region();
        let mut writer = BinaryWriter::new();
        record(&mut writer, player_ref_id(), 9, b"again");
        bytes.extend_from_slice(writer.as_bytes());

        let table = ChangeformTable::decode(&bytes, 4).unwrap();
        assert!(matches!(
            table.find_player(Flavor::SkyrimSe),
            Err(Error::DuplicatePlayer(2))
        ));
    }

    #[test]
    fn test_patch_only_touches_one_record() {
        let bytes = region();
        let mut table = ChangeformTable::decode(&bytes, 3).unwrap();
        table
            .get_mut(1)
            .unwrap()
            .set_payload(ChangeFlags::new(0x1), b"a longer player payload".to_vec());

        let out = table.encode().unwrap();
        let reread = ChangeformTable::decode(&out, 3).unwrap();
        assert_eq!(reread.get(0).unwrap().raw(), table.get(0).unwrap().raw());
        assert_eq!(reread.get(2).unwrap().raw(), table.get(2).unwrap().raw());
        assert_eq!(
            reread.get(1).unwrap().payload().unwrap().as_ref(),
            b"a longer player payload"
        );
    }

    #[test]
    fn test_count_and_region_must_agree() {
        let bytes = region();
        assert!(matches!(
            ChangeformTable::decode(&bytes, 2),
            Err(Error::InvalidRecord(_))
        ));
        assert!(matches!(
            ChangeformTable::decode(&bytes, 4),
            Err(Error::InvalidRecord(_))
        ));
    }
}
