//! A single changeform record.

use std::borrow::Cow;

use visage_common::{BinaryReader, BinaryWriter, RefId};
use visage_save::{compress_zlib, decompress_zlib_sized};

use crate::flags::ChangeFlags;
use crate::{Error, Result};

/// Width of the two length fields, taken from the top two bits of the type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LengthWidth {
    U8,
    U16,
    U32,
}

impl LengthWidth {
    /// Decode from the type byte.
    pub fn from_type_byte(type_byte: u8) -> Result<Self> {
        match type_byte >> 6 {
            0 => Ok(LengthWidth::U8),
            1 => Ok(LengthWidth::U16),
            2 => Ok(LengthWidth::U32),
            _ => Err(Error::InvalidRecord(format!(
                "length width tag 3 in type byte {:#04x}",
                type_byte
            ))),
        }
    }

    /// The two-bit tag stored in the type byte.
    pub const fn tag(&self) -> u8 {
        match self {
            LengthWidth::U8 => 0,
            LengthWidth::U16 => 1,
            LengthWidth::U32 => 2,
        }
    }

    /// Narrowest width holding `value`.
    pub const fn for_value(value: u32) -> Self {
        if value <= u8::MAX as u32 {
            LengthWidth::U8
        } else if value <= u16::MAX as u32 {
            LengthWidth::U16
        } else {
            LengthWidth::U32
        }
    }

    fn read(&self, reader: &mut BinaryReader<'_>) -> Result<u32> {
        Ok(match self {
            LengthWidth::U8 => u32::from(reader.read_u8()?),
            LengthWidth::U16 => u32::from(reader.read_u16()?),
            LengthWidth::U32 => reader.read_u32()?,
        })
    }

    fn write(&self, writer: &mut BinaryWriter, value: u32) {
        match self {
            LengthWidth::U8 => writer.write_u8(value as u8),
            LengthWidth::U16 => writer.write_u16(value as u16),
            LengthWidth::U32 => writer.write_u32(value),
        }
    }
}

/// Replacement content for a record.
#[derive(Debug, Clone)]
struct Patch {
    flags: ChangeFlags,
    payload: Vec<u8>,
}

/// One changeform record, borrowing its bytes from the changeform region.
///
/// An untouched record re-encodes as its original bytes. A patched record is
/// rebuilt from the new flags and payload.
#[derive(Debug, Clone)]
pub struct ChangeformRecord<'a> {
    form_id: RefId,
    flags: ChangeFlags,
    form_type: u8,
    version: u8,
    width: LengthWidth,
    /// Length of the uncompressed payload, 0 when stored.
    uncompressed_len: u32,
    data: &'a [u8],
    raw: &'a [u8],
    patch: Option<Patch>,
}

impl<'a> ChangeformRecord<'a> {
    /// Mask of the form type within the type byte.
    pub const TYPE_MASK: u8 = 0x3F;

    /// Read one record, consuming exactly the bytes it declares.
    pub fn read(reader: &mut BinaryReader<'a>) -> Result<Self> {
        let start = reader.position();

        let form_id = reader.read_ref_id()?;
        let flags = ChangeFlags::new(reader.read_u32()?);
        let type_byte = reader.read_u8()?;
        let version = reader.read_u8()?;
        let width = LengthWidth::from_type_byte(type_byte)?;
        let stored_len = width.read(reader)?;
        let uncompressed_len = width.read(reader)?;
        let data = reader.read_bytes(stored_len as usize)?;

        Ok(Self {
            form_id,
            flags,
            form_type: type_byte & Self::TYPE_MASK,
            version,
            width,
            uncompressed_len,
            data,
            raw: reader.consumed_since(start),
            patch: None,
        })
    }

    pub fn form_id(&self) -> RefId {
        self.form_id
    }

    /// Current change flags (the patched value once patched).
    pub fn flags(&self) -> ChangeFlags {
        self.patch.as_ref().map_or(self.flags, |p| p.flags)
    }

    /// Form type (low six bits of the type byte).
    pub fn form_type(&self) -> u8 {
        self.form_type
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether the stored payload is zlib-compressed.
    pub fn is_compressed(&self) -> bool {
        self.uncompressed_len != 0
    }

    pub fn is_modified(&self) -> bool {
        self.patch.is_some()
    }

    /// The record's original bytes, header included.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// The current uncompressed payload.
    pub fn payload(&self) -> Result<Cow<'_, [u8]>> {
        if let Some(patch) = &self.patch {
            return Ok(Cow::Borrowed(&patch.payload));
        }
        if self.is_compressed() {
            let expected = self.uncompressed_len as usize;
            let payload = decompress_zlib_sized(self.data, expected)?;
            if payload.len() != expected {
                return Err(Error::InvalidRecord(format!(
                    "record {} inflates to {} bytes, declared {}",
                    self.form_id,
                    payload.len(),
                    expected
                )));
            }
            Ok(Cow::Owned(payload))
        } else {
            Ok(Cow::Borrowed(self.data))
        }
    }

    /// Replace the flags and payload.
    pub fn set_payload(&mut self, flags: ChangeFlags, payload: Vec<u8>) {
        self.patch = Some(Patch { flags, payload });
    }

    /// Append the record's bytes.
    pub fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        let Some(patch) = &self.patch else {
            writer.write_bytes(self.raw);
            return Ok(());
        };

        let payload_len = u32::try_from(patch.payload.len()).map_err(|_| {
            Error::InvalidRecord(format!("payload of {} bytes too large", patch.payload.len()))
        })?;

        let compressed;
        let (stored, uncompressed_len): (&[u8], u32) = if self.is_compressed() {
            compressed = compress_zlib(&patch.payload)?;
            (&compressed, payload_len)
        } else {
            (&patch.payload, 0)
        };
        let stored_len = stored.len() as u32;

        let width = self
            .width
            .max(LengthWidth::for_value(stored_len))
            .max(LengthWidth::for_value(uncompressed_len));

        writer.write_ref_id(self.form_id);
        writer.write_u32(patch.flags.raw());
        writer.write_u8(self.form_type | (width.tag() << 6));
        writer.write_u8(self.version);
        width.write(writer, stored_len);
        width.write(writer, uncompressed_len);
        writer.write_bytes(stored);
        Ok(())
    }
}
