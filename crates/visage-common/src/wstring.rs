//! Length-prefixed save-file strings.

use std::fmt;

/// A `u16`-length-prefixed string as stored in save files.
///
/// The game writes these in the system code page, so the raw bytes are kept
/// untouched and only converted for display.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct WString {
    bytes: Vec<u8>,
}

impl WString {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes (without the prefix).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check for the empty string.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode for display.
    ///
    /// Valid UTF-8 is taken as is; anything else is read as Latin-1 so every
    /// byte maps to exactly one character.
    pub fn to_string_lossy(&self) -> String {
        match std::str::from_utf8(&self.bytes) {
            Ok(s) => s.to_owned(),
            Err(_) => self.bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl From<&str> for WString {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes().to_vec())
    }
}

impl fmt::Debug for WString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

impl fmt::Display for WString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for WString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_fallback() {
        let s = WString::from_bytes(vec![b'J', 0xE9, b'r']);
        assert_eq!(s.to_string_lossy(), "Jér");
        assert_eq!(s.len(), 3);
    }
}
