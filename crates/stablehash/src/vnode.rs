//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical node having a single point on the ring, each
//! node gets `factor` replicas, and every replica contributes several points
//! taken from one digest. This provides:
//!
//! 1. **Better Load Distribution**: more points give a smoother key spread
//! 2. **Gradual Rebalancing**: when nodes join or leave, only a fraction of keys move
//! 3. **Weighting**: a node's replica count is proportional to its weight
//!
//! Replica `j` of node `n` is hashed from the string `"{n}-{j}"`.

use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::token::HashKey;

/// A virtual node on the hash ring: one point owned by one physical node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualNode<N> {
    /// Position on the ring.
    pub token: HashKey,
    /// The physical node that owns this point.
    pub node: N,
}

impl<N: NodeId> VirtualNode<N> {
    #[inline]
    pub fn new(token: HashKey, node: N) -> Self {
        Self { token, node }
    }

    /// Hashing input for replica `replica` of `node`.
    pub fn replica_key(node: &N, replica: u32) -> String {
        format!("{}-{}", node, replica)
    }

    /// Points contributed by one replica of `node`.
    ///
    /// Takes at most `points_per_replica` points from the partitioner's
    /// sequence for the replica key, in digest order.
    pub fn from_replica<'a, P: Partitioner>(
        partitioner: &P,
        node: &'a N,
        replica: u32,
        points_per_replica: usize,
    ) -> impl Iterator<Item = VirtualNode<N>> + 'a
    where
        P::Points: 'a,
    {
        partitioner
            .points(&Self::replica_key(node, replica))
            .take(points_per_replica)
            .map(move |token| VirtualNode::new(token, node.clone()))
    }
}
