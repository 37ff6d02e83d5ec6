//! Save file decoding and encoding.

use std::fs;
use std::path::Path;

use visage_common::{BinaryReader, BinaryWriter};

use crate::body::GameDataLayout;
use crate::compress::Compression;
use crate::header::SaveHeader;
use crate::screenshot::Screenshot;
use crate::{Error, Flavor, Result};

/// A decoded save file.
///
/// The game data is held decompressed. Until it is replaced, the compressed
/// bytes read from disk are kept and written back unchanged, so an untouched
/// save encodes to exactly its original bytes.
#[derive(Debug, Clone)]
pub struct SaveFile {
    flavor: Flavor,
    header: SaveHeader,
    screenshot: Screenshot,
    compression: Compression,
    data: Vec<u8>,
    layout: GameDataLayout,
    /// Compressed blob as read, dropped once the data is modified.
    original_compressed: Option<Vec<u8>>,
    modified: bool,
}

impl SaveFile {
    /// Read and decode a save file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read(path)?;
        Self::decode(&raw)
    }

    /// Decode a save file from its raw bytes.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        let flavor = Flavor::detect(raw)?;
        let mut reader = BinaryReader::new_at(raw, flavor.magic().len());

        let header_size = reader.read_u32()? as usize;
        let header = SaveHeader::parse(reader.read_bytes(header_size)?, flavor)?;

        let screenshot = Screenshot::read(
            &mut reader,
            header.shot_width,
            header.shot_height,
            flavor.bytes_per_pixel(header.version),
        )?;

        // Logical position of the blob as if the file were stored uncompressed.
        let base = reader.position();

        let (compression, data, original_compressed) = match header.compression_type {
            Some(raw_type) => {
                let compression = Compression::from_raw(raw_type)?;
                let uncompressed_len = reader.read_u32()? as usize;
                let compressed_len = reader.read_u32()? as usize;
                let compressed = reader.read_bytes(compressed_len)?;
                let data = compression.decompress(compressed, uncompressed_len)?;
                let original = match compression {
                    Compression::None => None,
                    _ => Some(compressed.to_vec()),
                };
                (compression, data, original)
            }
            None => (Compression::None, reader.remaining_bytes().to_vec(), None),
        };

        if header.compression_type.is_some() && !reader.is_empty() {
            return Err(Error::InvalidLayout(format!(
                "{} trailing bytes after game data",
                reader.remaining()
            )));
        }

        let layout = GameDataLayout::parse(&data, flavor, base)?;

        tracing::debug!(
            flavor = %flavor,
            version = header.version,
            compression = ?compression,
            game_data_len = data.len(),
            plugins = layout.plugins.len(),
            change_forms = layout.locations.change_form_count,
            "decoded save file"
        );

        Ok(Self {
            flavor,
            header,
            screenshot,
            compression,
            data,
            layout,
            original_compressed,
            modified: false,
        })
    }

    /// Assemble a save from decoded parts.
    ///
    /// `data` is the uncompressed game data; its file location table must use
    /// offsets relative to the logical file position this header and
    /// screenshot imply (see [`SaveFile::logical_base`]).
    pub fn from_parts(
        flavor: Flavor,
        header: SaveHeader,
        screenshot: Screenshot,
        data: Vec<u8>,
    ) -> Result<Self> {
        let compression = match header.compression_type {
            Some(raw_type) => Compression::from_raw(raw_type)?,
            None => Compression::None,
        };
        if screenshot.width() != header.shot_width || screenshot.height() != header.shot_height {
            return Err(Error::InvalidLayout(format!(
                "screenshot {}x{} does not match header {}x{}",
                screenshot.width(),
                screenshot.height(),
                header.shot_width,
                header.shot_height
            )));
        }
        let base = Self::logical_base(flavor, &header, &screenshot)?;
        let layout = GameDataLayout::parse(&data, flavor, base)?;

        Ok(Self {
            flavor,
            header,
            screenshot,
            compression,
            data,
            layout,
            original_compressed: None,
            modified: false,
        })
    }

    /// Logical file offset of the first game-data byte.
    pub fn logical_base(flavor: Flavor, header: &SaveHeader, screenshot: &Screenshot) -> Result<usize> {
        Ok(flavor.magic().len() + 4 + header.to_bytes()?.len() + screenshot.pixels().len())
    }

    /// Encode back to raw bytes.
    ///
    /// Header fields are rewritten in their original order; the length fields
    /// are recomputed from the bytes actually produced.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header = self.header.to_bytes()?;

        let mut writer = BinaryWriter::with_capacity(
            self.flavor.magic().len() + 4 + header.len() + self.screenshot.pixels().len() + self.data.len() + 8,
        );
        writer.write_bytes(self.flavor.magic());
        writer.write_len_u32(header.len(), "header size")?;
        writer.write_bytes(&header);
        writer.write_bytes(self.screenshot.pixels());

        if self.header.compression_type.is_some() {
            let recompressed;
            let compressed: &[u8] = match (&self.original_compressed, self.compression) {
                (_, Compression::None) => &self.data,
                (Some(original), _) => original,
                (None, compression) => {
                    recompressed = compression.compress(&self.data)?;
                    &recompressed
                }
            };
            writer.write_len_u32(self.data.len(), "uncompressed length")?;
            writer.write_len_u32(compressed.len(), "compressed length")?;
            writer.write_bytes(compressed);
        } else {
            writer.write_bytes(&self.data);
        }

        Ok(writer.into_inner())
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn header(&self) -> &SaveHeader {
        &self.header
    }

    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn layout(&self) -> &GameDataLayout {
        &self.layout
    }

    /// Get the decompressed game data.
    pub fn game_data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the game data has been replaced since decoding.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Get the changeform region and its record count.
    pub fn changeform_region(&self) -> Result<(&[u8], u32)> {
        let range = self.layout.changeform_range()?;
        Ok((&self.data[range], self.layout.locations.change_form_count))
    }

    /// Replace the changeform region with re-encoded bytes.
    ///
    /// The record count is unchanged. Every table offset past the region start
    /// moves by the size difference.
    pub fn replace_changeform_region(&mut self, region: Vec<u8>) -> Result<()> {
        let range = self.layout.changeform_range()?;
        let delta = region.len() as i64 - range.len() as i64;

        let mut locations = self.layout.locations;
        locations.shift_after_changeforms(delta)?;

        self.data.splice(range, region);

        let at = self.layout.locations_at;
        self.data[at..at + crate::body::FileLocationTable::SIZE]
            .copy_from_slice(zerocopy::IntoBytes::as_bytes(&locations));
        self.layout.locations = locations;
        self.original_compressed = None;
        self.modified = true;

        tracing::debug!(delta, game_data_len = self.data.len(), "replaced changeform region");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::FileLocationTable;
    use crate::header::Sex;
    use visage_common::WString;

    fn header(flavor: Flavor, compression_type: Option<u16>) -> SaveHeader {
        SaveHeader {
            version: if flavor == Flavor::SkyrimSe { 12 } else { 15 },
            save_number: 3,
            player_name: WString::from("Prisoner"),
            player_level: 1,
            player_location: WString::from("Helgen"),
            game_date: WString::from("000.10.05"),
            race_editor_id: WString::from("NordRace"),
            sex: Sex::Male,
            current_exp: 0.0,
            level_up_exp: 75.0,
            filetime: 1,
            shot_width: 2,
            shot_height: 2,
            compression_type,
            trailing: Vec::new(),
        }
    }

    fn game_data(flavor: Flavor, base: usize, region: &[u8]) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer.write_u8(74);
        if flavor.has_game_version() {
            writer.write_wstring(&WString::from("1.10.163.0")).unwrap();
        }
        writer.write_u32(1);
        writer.write_u8(0);
        if flavor.has_light_plugins(74) {
            writer.write_u16(0);
        }
        let start = (base + writer.position() + FileLocationTable::SIZE) as u32;
        let end = start + region.len() as u32;
        writer.write_struct(&FileLocationTable {
            form_id_array_count_offset: end + 8,
            unknown_table3_offset: end + 12,
            global_data_table1_offset: start,
            global_data_table2_offset: start,
            change_forms_offset: start,
            global_data_table3_offset: end,
            global_data_table1_count: 0,
            global_data_table2_count: 0,
            global_data_table3_count: 0,
            change_form_count: 2,
            unused: [0; 15],
        });
        writer.write_bytes(region);
        writer.write_bytes(&[0xEE; 16]);
        writer.into_inner()
    }

    fn build(flavor: Flavor, compression_type: Option<u16>) -> Vec<u8> {
        let header = header(flavor, compression_type);
        let screenshot = Screenshot::new(2, 2, 4, (0..16).collect()).unwrap();
        let base = SaveFile::logical_base(flavor, &header, &screenshot).unwrap();
        let data = game_data(flavor, base, b"two records");
        SaveFile::from_parts(flavor, header, screenshot, data)
            .unwrap()
            .encode()
            .unwrap()
    }

    #[test]
    fn test_untouched_save_encodes_identically() {
        for (flavor, compression) in [
            (Flavor::SkyrimSe, Some(2)),
            (Flavor::SkyrimSe, Some(1)),
            (Flavor::SkyrimSe, Some(0)),
            (Flavor::Fallout4, None),
        ] {
            let raw = build(flavor, compression);
            let save = SaveFile::decode(&raw).unwrap();
            assert_eq!(save.flavor(), flavor);
            assert!(!save.is_modified());
            assert_eq!(save.encode().unwrap(), raw);
        }
    }

    #[test]
    fn test_replaced_region_shifts_offsets() {
        let raw = build(Flavor::SkyrimSe, Some(2));
        let mut save = SaveFile::decode(&raw).unwrap();
        let before = save.layout().locations;

        save.replace_changeform_region(b"two longer records".to_vec()).unwrap();
        assert!(save.is_modified());

        let once = save.encode().unwrap();
        let reread = SaveFile::decode(&once).unwrap();
        let (region, count) = reread.changeform_region().unwrap();
        assert_eq!(region, b"two longer records");
        assert_eq!(count, 2);

        let after = reread.layout().locations;
        assert_eq!(after.change_forms_offset, before.change_forms_offset);
        assert_eq!(after.global_data_table3_offset, before.global_data_table3_offset + 7);
        assert_eq!(after.form_id_array_count_offset, before.form_id_array_count_offset + 7);

        // Trailing game data after the region is untouched.
        assert!(reread.game_data().ends_with(&[0xEE; 16]));
        assert_eq!(reread.encode().unwrap(), once);
    }

    #[test]
    fn test_declared_length_must_match() {
        let mut raw = build(Flavor::SkyrimSe, Some(1));
        let save = SaveFile::decode(&raw).unwrap();
        let header_len = save.header().to_bytes().unwrap().len();
        let at = Flavor::SKYRIM_MAGIC.len() + 4 + header_len + 16;
        let declared = u32::from_le_bytes(raw[at..at + 4].try_into().unwrap());
        raw[at..at + 4].copy_from_slice(&(declared + 1).to_le_bytes());

        assert!(matches!(
            SaveFile::decode(&raw),
            Err(Error::SizeMismatch { .. }) | Err(Error::Decompression(_))
        ));
    }

    #[test]
    fn test_unknown_magic() {
        let raw = b"NOT_A_SAVE_AT_ALL";
        assert!(matches!(
            SaveFile::decode(raw),
            Err(Error::UnrecognizedMagic(token)) if token == "NOT_A_SAVE_AT"
        ));
    }

    #[test]
    fn test_truncated_file() {
        let raw = build(Flavor::Fallout4, None);
        assert!(SaveFile::decode(&raw[..40]).is_err());
    }
}
