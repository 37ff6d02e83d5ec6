//! Binary writer, the counterpart of [`BinaryReader`](crate::BinaryReader).

use zerocopy::{Immutable, IntoBytes};

use crate::refid::RefId;
use crate::vsval;
use crate::wstring::WString;
use crate::{Error, Result};

/// Appends little-endian values to a growable buffer.
///
/// Every `write_*` method mirrors a `read_*` method on the reader, so a value
/// written here reads back to the same bytes.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Create an empty writer with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Get the written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning the buffer.
    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Write an f32 by its exact bit pattern.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    /// Write a `usize` that must fit in a u32.
    pub fn write_len_u32(&mut self, len: usize, field: &'static str) -> Result<()> {
        let value = u32::try_from(len).map_err(|_| Error::Overflow {
            field,
            value: len as u64,
        })?;
        self.write_u32(value);
        Ok(())
    }

    /// Write a `u16`-length-prefixed string.
    pub fn write_wstring(&mut self, value: &WString) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| Error::Overflow {
            field: "wstring length",
            value: value.len() as u64,
        })?;
        self.write_u16(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    /// Write a vsval using the narrowest width.
    pub fn write_vsval(&mut self, value: u32) -> Result<()> {
        vsval::encode(value, &mut self.buf)
    }

    /// Write a list length as a vsval.
    pub fn write_vsval_len(&mut self, len: usize) -> Result<()> {
        let value = u32::try_from(len).map_err(|_| Error::Overflow {
            field: "vsval",
            value: len as u64,
        })?;
        self.write_vsval(value)
    }

    #[inline]
    pub fn write_ref_id(&mut self, value: RefId) {
        self.write_bytes(value.as_bytes());
    }

    /// Write a struct using zerocopy.
    #[inline]
    pub fn write_struct<T: IntoBytes + Immutable>(&mut self, value: &T) {
        self.write_bytes(value.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_mirrors_reader() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0xDEADBEEF);
        writer.write_i16(-2);
        writer.write_wstring(&WString::from("Whiterun")).unwrap();
        writer.write_vsval(300).unwrap();
        writer.write_ref_id(RefId::default_form(0x14));
        writer.write_f32(-0.5);

        let bytes = writer.into_inner();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_i16().unwrap(), -2);
        assert_eq!(reader.read_wstring().unwrap().to_string_lossy(), "Whiterun");
        assert_eq!(reader.read_vsval().unwrap(), 300);
        assert_eq!(reader.read_ref_id().unwrap(), RefId::default_form(0x14));
        assert_eq!(reader.read_f32().unwrap(), -0.5);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_wstring_too_long() {
        let mut writer = BinaryWriter::new();
        let long = WString::from_bytes(vec![b'a'; 70_000]);
        assert!(writer.write_wstring(&long).is_err());
    }
}
