//! 32-bit ring position.

use crate::token::traits::Token;

/// Position on the ring, decoded from four digest bytes.
///
/// Bytes are read little-endian: `b[3] << 24 | b[2] << 16 | b[1] << 8 | b[0]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HashKey(pub u32);

impl HashKey {
    /// Decodes a key from a 4-byte slice of a digest.
    #[inline]
    pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
        HashKey(u32::from_le_bytes(bytes))
    }

    /// Raw value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Token for HashKey {
    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn distance_to(&self, other: &Self) -> Self {
        HashKey(other.0.wrapping_sub(self.0))
    }
}
