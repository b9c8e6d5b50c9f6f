//! SipHash partitioner.

use std::hash::Hasher;

use siphasher::sip::SipHasher13;

use crate::partitioner::traits::Partitioner;
use crate::token::HashKey;

/// SipHash-1-3 partitioner with fixed keys.
///
/// Yields two points per key: the low and then the high 32 bits of the
/// 64-bit hash. Rings built with it are not interchangeable with MD5 rings.
#[derive(Clone, Copy, Debug)]
pub struct SipPartitioner {
    k0: u64,
    k1: u64,
}

impl SipPartitioner {
    pub fn new(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }

    fn hash(&self, key: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        hasher.write(key.as_bytes());
        hasher.finish()
    }
}

impl Default for SipPartitioner {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Partitioner for SipPartitioner {
    type Points = std::array::IntoIter<HashKey, 2>;

    fn points(&self, key: &str) -> Self::Points {
        let h = self.hash(key);
        [HashKey(h as u32), HashKey((h >> 32) as u32)].into_iter()
    }

    fn partition(&self, key: &str) -> HashKey {
        HashKey(self.hash(key) as u32)
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
