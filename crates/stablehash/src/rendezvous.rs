//! Weighted rendezvous (highest random weight) selection.
//!
//! Every node is scored independently for a key and the highest scores win,
//! so no shared ordered structure is needed and adding or removing a node
//! only moves the keys that node wins or held.
//!
//! Scoring follows the logarithmic method for weighted HRW: the key/node
//! hash is mapped into the unit interval as `u` and the score is
//! `weight / -ln(u)`.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::node::{NodeId, Weight};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::token::HashKey;

/// Low 53 bits: the mantissa width of an `f64`.
const MANTISSA_MASK: u64 = u64::MAX >> (64 - 53);
const MANTISSA_SCALE: f64 = (1u64 << 53) as f64;

/// Maps a ring point onto `[0, 1)`.
///
/// Only the low 53 bits are kept so the division is exact; a 32-bit point
/// therefore lands below `2^-21`.
#[inline]
pub fn unit_interval(hash: HashKey) -> f64 {
    (u64::from(hash.value()) & MANTISSA_MASK) as f64 / MANTISSA_SCALE
}

/// Scores nodes for keys and picks winners.
#[derive(Debug)]
pub struct RendezvousEngine<P = Md5Partitioner> {
    partitioner: Arc<P>,
}

impl<P> Clone for RendezvousEngine<P> {
    fn clone(&self) -> Self {
        Self {
            partitioner: Arc::clone(&self.partitioner),
        }
    }
}

impl Default for RendezvousEngine<Md5Partitioner> {
    fn default() -> Self {
        Self::new(Arc::new(Md5Partitioner))
    }
}

impl<P: Partitioner> RendezvousEngine<P> {
    pub fn new(partitioner: Arc<P>) -> Self {
        Self { partitioner }
    }

    pub fn partitioner(&self) -> &Arc<P> {
        &self.partitioner
    }

    /// Score of `node` for `key`. Higher wins.
    ///
    /// The hashed input is the node's display form followed by the key.
    pub fn score<N: NodeId>(&self, key: &str, node: &N, weight: Weight) -> f64 {
        let hash = self.partitioner.partition(&format!("{}{}", node, key));
        let score = 1.0 / -unit_interval(hash).ln();
        f64::from(weight) * score
    }

    /// The node with the greatest score, `None` when `nodes` is empty.
    ///
    /// Equal scores go to the smaller node id.
    pub fn pick_one<'a, N: NodeId>(&self, nodes: &'a BTreeMap<N, Weight>, key: &str) -> Option<&'a N> {
        nodes
            .iter()
            .map(|(node, weight)| (node, self.score(key, node, *weight)))
            .max_by(|a, b| rank(a, b).reverse())
            .map(|(node, _)| node)
    }

    /// The `size` highest-scoring nodes, best first.
    ///
    /// Ties are ordered by ascending node id. Returns fewer than `size`
    /// nodes only when `nodes` holds fewer.
    pub fn pick_top_k<'a, N: NodeId>(
        &self,
        nodes: &'a BTreeMap<N, Weight>,
        key: &str,
        size: usize,
    ) -> Vec<&'a N> {
        let mut scored: Vec<(&N, f64)> = nodes
            .iter()
            .map(|(node, weight)| (node, self.score(key, node, *weight)))
            .collect();
        scored.sort_by(rank);
        scored.into_iter().take(size).map(|(node, _)| node).collect()
    }
}

/// Best-first order: descending score, then ascending node id.
fn rank<N: Ord>(a: &(&N, f64), b: &(&N, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
