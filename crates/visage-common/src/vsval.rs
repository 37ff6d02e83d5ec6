//! Variable-size integers.
//!
//! A vsval stores its width in the two low bits of the first byte:
//! `0` means one byte, `1` two bytes, `2` four bytes. The value is the
//! little-endian integer shifted right by two. Values up to `0x3FFF_FFFF`
//! are representable.

use crate::{Error, Result};

/// Largest value a vsval can hold.
pub const MAX: u32 = 0x3FFF_FFFF;

/// Width in bytes announced by the first byte of a vsval.
#[inline]
pub fn width(first: u8) -> Result<usize> {
    match first & 0b11 {
        0 => Ok(1),
        1 => Ok(2),
        2 => Ok(4),
        tag => Err(Error::InvalidVsval(tag)),
    }
}

/// Encoded length of `value` using the narrowest width.
#[inline]
pub const fn encoded_len(value: u32) -> usize {
    if value < 0x40 {
        1
    } else if value < 0x4000 {
        2
    } else {
        4
    }
}

/// Encode `value` using the narrowest width.
pub fn encode(value: u32, out: &mut Vec<u8>) -> Result<()> {
    if value > MAX {
        return Err(Error::Overflow {
            field: "vsval",
            value: u64::from(value),
        });
    }
    match encoded_len(value) {
        1 => out.push((value << 2) as u8),
        2 => out.extend_from_slice(&(((value << 2) | 1) as u16).to_le_bytes()),
        _ => out.extend_from_slice(&((value << 2) | 2).to_le_bytes()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len_boundaries() {
        assert_eq!(encoded_len(0x3F), 1);
        assert_eq!(encoded_len(0x40), 2);
        assert_eq!(encoded_len(0x3FFF), 2);
        assert_eq!(encoded_len(0x4000), 4);
    }

    #[test]
    fn test_encode_known_bytes() {
        let mut out = Vec::new();
        encode(5, &mut out).unwrap();
        encode(0x100, &mut out).unwrap();
        assert_eq!(out, [0x14, 0x01, 0x04]);
    }

    #[test]
    fn test_overflow_rejected() {
        let mut out = Vec::new();
        assert!(encode(MAX + 1, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_width_tag() {
        assert!(matches!(width(0b11), Err(Error::InvalidVsval(3))));
    }
}
