//! Hash ring data structure and lookup.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::node::NodeId;
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::token::{HashKey, Token};

/// Immutable ring of virtual points.
///
/// `sorted_keys` may contain the same key more than once (colliding
/// points, duplicate node entries); `owners` holds one owner per key.
pub struct HashRing<N, P = Md5Partitioner> {
    partitioner: Arc<P>,
    sorted_keys: Vec<HashKey>,
    owners: HashMap<HashKey, N>,
}

impl<N: NodeId, P: Partitioner> HashRing<N, P> {
    pub(crate) fn from_parts(
        partitioner: Arc<P>,
        sorted_keys: Vec<HashKey>,
        owners: HashMap<HashKey, N>,
    ) -> Self {
        debug_assert!(sorted_keys.windows(2).all(|w| w[0] <= w[1]));
        Self {
            partitioner,
            sorted_keys,
            owners,
        }
    }

    /// Index of the first ring point at or after `key`'s position,
    /// wrapping to 0 past the last point. `None` on an empty ring.
    pub fn locate(&self, key: &str) -> Option<usize> {
        if self.sorted_keys.is_empty() {
            return None;
        }
        let hash = self.partitioner.partition(key);
        let pos = self.sorted_keys.partition_point(|k| *k < hash);
        Some(pos % self.sorted_keys.len())
    }

    /// Owner of the point at `index` in sorted order.
    fn owner_at(&self, index: usize) -> Option<&N> {
        self.sorted_keys
            .get(index)
            .and_then(|k| self.owners.get(k))
    }

    /// The node owning `key`, or `None` when the ring is empty.
    pub fn get_node(&self, key: &str) -> Option<&N> {
        self.locate(key).and_then(|idx| self.owner_at(idx))
    }

    /// Walks clockwise from `key`'s position and collects the first `size`
    /// distinct owners in the order they are met.
    ///
    /// Returns an empty vector when a full circle yields fewer than `size`
    /// distinct owners.
    pub fn get_nodes(&self, key: &str, size: usize) -> Vec<&N> {
        let Some(start) = self.locate(key) else {
            return Vec::new();
        };
        let len = self.sorted_keys.len();

        let mut seen = HashSet::with_capacity(size);
        let mut picked = Vec::with_capacity(size);
        for i in start..start + len {
            if picked.len() == size {
                break;
            }
            if let Some(node) = self.owner_at(i % len) {
                if seen.insert(node) {
                    picked.push(node);
                }
            }
        }

        if picked.len() == size {
            picked
        } else {
            trace!(key, size, found = picked.len(), "not enough distinct nodes on ring");
            Vec::new()
        }
    }

    /// Share of the key space owned by each node.
    ///
    /// Each point owns the arc from the previous point (exclusive) up to
    /// itself. Shares sum to 1.0 on a non-empty ring.
    pub fn ownership(&self) -> HashMap<N, f64> {
        let mut shares: HashMap<N, f64> = HashMap::new();
        let len = self.sorted_keys.len();
        if len == 0 {
            return shares;
        }
        let full = f64::from(u32::MAX) + 1.0;
        if len == 1 || self.sorted_keys[0] == self.sorted_keys[len - 1] {
            if let Some(owner) = self.owner_at(0) {
                shares.insert(owner.clone(), 1.0);
            }
            return shares;
        }
        for i in 0..len {
            let prev = self.sorted_keys[(i + len - 1) % len];
            let arc = prev.distance_to(&self.sorted_keys[i]);
            if arc.is_zero() {
                continue;
            }
            if let Some(owner) = self.owner_at(i) {
                *shares.entry(owner.clone()).or_insert(0.0) += f64::from(arc.value()) / full;
            }
        }
        shares
    }

    /// All points in ascending key order with their owners.
    pub fn points(&self) -> impl Iterator<Item = (HashKey, &N)> + '_ {
        self.sorted_keys
            .iter()
            .filter_map(move |k| self.owners.get(k).map(|n| (*k, n)))
    }

    /// Number of points, counting repeated keys.
    pub fn point_count(&self) -> usize {
        self.sorted_keys.len()
    }

    /// Number of distinct nodes owning at least one point.
    pub fn owner_count(&self) -> usize {
        self.owners.values().collect::<HashSet<_>>().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_keys.is_empty()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }
}

impl<N: fmt::Debug, P> fmt::Debug for HashRing<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("points", &self.sorted_keys.len())
            .field("owners", &self.owners.len())
            .finish()
    }
}
