//! Change flag bitmask.

use std::fmt;

/// The 32-bit change flags of a changeform.
///
/// Each set bit announces one optional group in the record payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChangeFlags(u32);

impl ChangeFlags {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(&self, bit: u8) -> bool {
        bit < 32 && self.0 & (1 << bit) != 0
    }

    #[inline]
    pub const fn with(self, bit: u8) -> Self {
        Self(self.0 | (1 << bit))
    }

    #[inline]
    pub const fn without(self, bit: u8) -> Self {
        Self(self.0 & !(1 << bit))
    }

    /// Iterate the set bit positions in ascending order.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        (0u8..32).filter(move |&bit| self.contains(bit))
    }
}

impl fmt::Debug for ChangeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeFlags({:#010x})", self.0)
    }
}

impl fmt::Display for ChangeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChangeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}
