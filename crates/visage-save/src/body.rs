//! Game-data blob layout: plugin lists and the file location table.

use visage_common::{BinaryReader, WString};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Flavor, Result};

/// The file location table.
///
/// Offsets are absolute positions in the logical uncompressed file (see
/// [`SaveFile`](crate::SaveFile)); counts are record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct FileLocationTable {
    pub form_id_array_count_offset: u32,
    pub unknown_table3_offset: u32,
    pub global_data_table1_offset: u32,
    pub global_data_table2_offset: u32,
    pub change_forms_offset: u32,
    pub global_data_table3_offset: u32,
    pub global_data_table1_count: u32,
    pub global_data_table2_count: u32,
    pub global_data_table3_count: u32,
    pub change_form_count: u32,
    pub unused: [u32; 15],
}

impl FileLocationTable {
    /// Size of the table in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Shift every offset lying past the changeform start by `delta`.
    ///
    /// The changeform region itself starts at the same place; everything after
    /// it moves when the region grows or shrinks.
    pub fn shift_after_changeforms(&mut self, delta: i64) -> Result<()> {
        let start = self.change_forms_offset;
        for offset in [
            &mut self.form_id_array_count_offset,
            &mut self.unknown_table3_offset,
            &mut self.global_data_table1_offset,
            &mut self.global_data_table2_offset,
            &mut self.global_data_table3_offset,
        ] {
            if *offset > start {
                let shifted = i64::from(*offset) + delta;
                *offset = u32::try_from(shifted).map_err(|_| {
                    Error::InvalidLayout(format!("offset {} out of range after shift", shifted))
                })?;
            }
        }
        Ok(())
    }
}

/// The parsed prefix of the game-data blob.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameDataLayout {
    pub form_version: u8,
    /// Fallout 4 only.
    pub game_version: Option<WString>,
    pub plugins: Vec<WString>,
    pub light_plugins: Vec<WString>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub locations: FileLocationTable,
    /// Blob-relative position of the file location table.
    pub locations_at: usize,
    /// Logical file position of blob byte 0.
    pub base: usize,
}

impl GameDataLayout {
    /// Parse the blob prefix. `base` is the logical file offset of the blob.
    pub fn parse(data: &[u8], flavor: Flavor, base: usize) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let form_version = reader.read_u8()?;
        let game_version = if flavor.has_game_version() {
            Some(reader.read_wstring()?)
        } else {
            None
        };

        let plugin_info_size = reader.read_u32()? as usize;
        let plugin_info = reader.read_bytes(plugin_info_size)?;
        let plugins = parse_plugin_info(plugin_info)?;

        let light_plugins = if flavor.has_light_plugins(form_version) {
            let count = reader.read_u16()?;
            (0..count)
                .map(|_| reader.read_wstring())
                .collect::<visage_common::Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let locations_at = reader.position();
        let locations: FileLocationTable = reader.read_struct()?;

        let layout = Self {
            form_version,
            game_version,
            plugins,
            light_plugins,
            locations,
            locations_at,
            base,
        };
        layout.validate(data.len())?;
        Ok(layout)
    }

    /// Blob-relative range of the changeform region.
    pub fn changeform_range(&self) -> Result<std::ops::Range<usize>> {
        let start = self.to_blob_offset(self.locations.change_forms_offset, "change forms")?;
        let end = self.to_blob_offset(self.locations.global_data_table3_offset, "global data 3")?;
        Ok(start..end)
    }

    fn to_blob_offset(&self, absolute: u32, what: &str) -> Result<usize> {
        (absolute as usize).checked_sub(self.base).ok_or_else(|| {
            Error::InvalidLayout(format!(
                "{} offset {} lies before the game data at {}",
                what, absolute, self.base
            ))
        })
    }

    fn validate(&self, blob_len: usize) -> Result<()> {
        let range = self.changeform_range()?;
        let table_end = self.locations_at + FileLocationTable::SIZE;
        if range.start < table_end || range.start > range.end || range.end > blob_len {
            return Err(Error::InvalidLayout(format!(
                "changeform region {}..{} outside {}..{}",
                range.start, range.end, table_end, blob_len
            )));
        }
        Ok(())
    }
}

fn parse_plugin_info(data: &[u8]) -> Result<Vec<WString>> {
    let mut reader = BinaryReader::new(data);
    let count = reader.read_u8()?;
    let plugins = (0..count)
        .map(|_| reader.read_wstring())
        .collect::<visage_common::Result<Vec<_>>>()?;
    if !reader.is_empty() {
        return Err(Error::InvalidLayout(format!(
            "{} unread bytes in plugin info",
            reader.remaining()
        )));
    }
    Ok(plugins)
}
