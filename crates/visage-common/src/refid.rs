//! RefID - the 3-byte form reference used in save files.
//!
//! A RefID is stored big-endian in three bytes. The top two bits of the
//! 24-bit value select how the remaining 22 bits are interpreted.

use std::fmt;

/// How a [`RefId`] resolves to a FormID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RefIdKind {
    /// Index into the save's FormID array.
    FormIdArray,
    /// A form from the base game master.
    Default,
    /// A form created at runtime.
    Created,
    /// Reserved.
    Unknown,
}

/// A 3-byte form reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RefId {
    bytes: [u8; 3],
}

impl RefId {
    /// The null reference.
    pub const NULL: Self = Self { bytes: [0; 3] };

    /// Create from the three raw bytes as stored.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self { bytes }
    }

    /// Create from a 24-bit value. Higher bits are discarded.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            bytes: [(raw >> 16) as u8, (raw >> 8) as u8, raw as u8],
        }
    }

    /// Create a reference to a base-game form.
    #[inline]
    pub const fn default_form(form_id: u32) -> Self {
        Self::from_raw(0x40_0000 | (form_id & 0x3F_FFFF))
    }

    /// Get the raw bytes as stored.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.bytes
    }

    /// Get the 24-bit value.
    #[inline]
    pub const fn raw(&self) -> u32 {
        ((self.bytes[0] as u32) << 16) | ((self.bytes[1] as u32) << 8) | self.bytes[2] as u32
    }

    /// Get the reference kind from the top two bits.
    #[inline]
    pub const fn kind(&self) -> RefIdKind {
        match self.bytes[0] >> 6 {
            0 => RefIdKind::FormIdArray,
            1 => RefIdKind::Default,
            2 => RefIdKind::Created,
            _ => RefIdKind::Unknown,
        }
    }

    /// Get the 22-bit value without the kind bits.
    #[inline]
    pub const fn form_id(&self) -> u32 {
        self.raw() & 0x3F_FFFF
    }

    /// Check for the null reference.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.bytes == [0; 3]
    }
}

impl fmt::Debug for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefId({:?}, {:06X})", self.kind(), self.form_id())
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}", self.raw())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RefId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
