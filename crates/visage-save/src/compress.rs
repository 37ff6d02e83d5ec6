//! Game-data compression.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::{Error, Result};

/// Compression applied to the game-data blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Compression {
    /// Stored as is.
    None,
    /// zlib stream.
    Zlib,
    /// LZ4 block, no frame and no size prefix.
    Lz4,
}

impl Compression {
    /// Map the header's compression type.
    pub fn from_raw(raw: u16) -> Result<Self> {
        match raw {
            0 => Ok(Compression::None),
            1 => Ok(Compression::Zlib),
            2 => Ok(Compression::Lz4),
            other => Err(Error::UnsupportedCompression(other)),
        }
    }

    pub fn raw(&self) -> u16 {
        match self {
            Compression::None => 0,
            Compression::Zlib => 1,
            Compression::Lz4 => 2,
        }
    }

    /// Decompress `data`, requiring exactly `expected_size` output bytes.
    pub fn decompress(&self, data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
        let output = match self {
            Compression::None => data.to_vec(),
            Compression::Zlib => decompress_zlib_sized(data, expected_size)?,
            Compression::Lz4 => lz4_flex::block::decompress(data, expected_size)
                .map_err(|e| Error::Decompression(e.to_string()))?,
        };

        if output.len() != expected_size {
            return Err(Error::SizeMismatch {
                expected: expected_size,
                actual: output.len(),
            });
        }

        Ok(output)
    }

    /// Compress `data`.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Zlib => compress_zlib(data),
            Compression::Lz4 => Ok(lz4_flex::block::compress(data)),
        }
    }
}

/// Decompress a zlib stream with a known output size.
pub fn decompress_zlib_sized(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size);
    ZlibDecoder::new(data)
        .read_to_end(&mut output)
        .map_err(|e| Error::Decompression(e.to_string()))?;
    Ok(output)
}

/// Compress into a zlib stream at the default level.
pub fn compress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"changeform changeform changeform changeform payload";

    #[test]
    fn test_lz4_block() {
        let compressed = Compression::Lz4.compress(SAMPLE).unwrap();
        let decompressed = Compression::Lz4.decompress(&compressed, SAMPLE.len()).unwrap();
        assert_eq!(decompressed, SAMPLE);
    }

    #[test]
    fn test_zlib() {
        let compressed = Compression::Zlib.compress(SAMPLE).unwrap();
        let decompressed = Compression::Zlib.decompress(&compressed, SAMPLE.len()).unwrap();
        assert_eq!(decompressed, SAMPLE);
    }

    #[test]
    fn test_declared_length_mismatch() {
        let compressed = Compression::Zlib.compress(SAMPLE).unwrap();
        assert!(matches!(
            Compression::Zlib.decompress(&compressed, SAMPLE.len() + 1),
            Err(Error::SizeMismatch { .. })
        ));
        assert!(Compression::None.decompress(SAMPLE, 3).is_err());
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            Compression::from_raw(9),
            Err(Error::UnsupportedCompression(9))
        ));
    }
}
