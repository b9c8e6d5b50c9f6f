//! MD5 partitioner: the default fingerprint for ring and rendezvous hashing.
//!
//! The ring layout produced with this partitioner matches the long-standing
//! memcached client layout (ketama-style points, little-endian decode), so
//! keys land on the same nodes as other clients using that layout.

use md5::{Digest, Md5};

use crate::partitioner::traits::Partitioner;
use crate::token::HashKey;

const DIGEST_LEN: usize = 16;
const KEY_WIDTH: usize = 4;

/// Computes the 16-byte MD5 digest of `key`'s UTF-8 bytes.
pub fn digest(key: &str) -> [u8; DIGEST_LEN] {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Md5::digest(key.as_bytes()));
    out
}

/// MD5 partitioner. Chosen for ring compatibility, not for security.
#[derive(Clone, Copy, Debug, Default)]
pub struct Md5Partitioner;

impl Partitioner for Md5Partitioner {
    type Points = DigestPoints;

    fn points(&self, key: &str) -> Self::Points {
        DigestPoints {
            digest: digest(key),
            offset: 0,
        }
    }

    fn partition(&self, key: &str) -> HashKey {
        let d = digest(key);
        HashKey::from_le_bytes([d[0], d[1], d[2], d[3]])
    }

    fn name(&self) -> &'static str {
        "Md5Partitioner"
    }
}

/// The four 4-byte groups of one MD5 digest, decoded as [`HashKey`]s.
#[derive(Clone, Debug)]
pub struct DigestPoints {
    digest: [u8; DIGEST_LEN],
    offset: usize,
}

impl Iterator for DigestPoints {
    type Item = HashKey;

    fn next(&mut self) -> Option<HashKey> {
        if self.offset + KEY_WIDTH > DIGEST_LEN {
            return None;
        }
        let d = &self.digest[self.offset..self.offset + KEY_WIDTH];
        self.offset += KEY_WIDTH;
        Some(HashKey::from_le_bytes([d[0], d[1], d[2], d[3]]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (DIGEST_LEN - self.offset) / KEY_WIDTH;
        (left, Some(left))
    }
}

impl ExactSizeIterator for DigestPoints {}
