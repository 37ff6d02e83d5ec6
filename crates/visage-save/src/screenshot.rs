//! The embedded save screenshot.

use visage_common::BinaryReader;

use crate::{Error, Result};

/// Raw screenshot pixels in their stored layout.
///
/// Pixels are kept exactly as stored (RGB or RGBA). Conversions for display
/// never write back into this buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    pixels: Vec<u8>,
}

impl Screenshot {
    /// Create a screenshot, checking the buffer length.
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, bytes_per_pixel)?;
        if pixels.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            pixels,
        })
    }

    /// Read `width * height * bytes_per_pixel` bytes.
    pub fn read(
        reader: &mut BinaryReader<'_>,
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
    ) -> Result<Self> {
        let len = byte_len(width, height, bytes_per_pixel)?;
        let pixels = reader.read_bytes(len)?.to_vec();
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Either 3 (RGB) or 4 (RGBA).
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Get the stored pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

fn byte_len(width: u32, height: u32, bytes_per_pixel: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bytes_per_pixel))
        .ok_or_else(|| {
            Error::InvalidLayout(format!(
                "screenshot {}x{}x{} overflows",
                width, height, bytes_per_pixel
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_checked() {
        assert!(Screenshot::new(2, 2, 4, vec![0; 16]).is_ok());
        assert!(matches!(
            Screenshot::new(2, 2, 3, vec![0; 16]),
            Err(Error::SizeMismatch { expected: 12, actual: 16 })
        ));
    }

    #[test]
    fn test_read_consumes_exact_bytes() {
        let data = [7u8; 20];
        let mut reader = BinaryReader::new(&data);
        let shot = Screenshot::read(&mut reader, 2, 3, 3).unwrap();
        assert_eq!(shot.pixels().len(), 18);
        assert_eq!(reader.remaining(), 2);
    }
}
