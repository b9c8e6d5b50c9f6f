//! Tagged hash space and factory functions.

use crate::error::Result;
use crate::hash::{ConsistentHash, RendezvousHash, StableHash};
use crate::node::{NodeId, Weight};
use crate::partitioner::{Md5Partitioner, Partitioner};

/// Which algorithm a [`HashSpace`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    Consistent,
    Rendezvous,
}

/// A hash space of either kind behind one type.
#[derive(Debug, Clone)]
pub enum HashSpace<N, P = Md5Partitioner> {
    Consistent(ConsistentHash<N, P>),
    Rendezvous(RendezvousHash<N, P>),
}

/// Consistent hash ring over `nodes`, all with weight 1.
pub fn new_consistent_hash<N: NodeId>(nodes: impl IntoIterator<Item = N>) -> HashSpace<N> {
    HashSpace::Consistent(ConsistentHash::new(nodes))
}

/// Consistent hash ring over the nodes of `weights`.
pub fn new_consistent_hash_weighted<N: NodeId>(
    weights: impl IntoIterator<Item = (N, Weight)>,
) -> Result<HashSpace<N>> {
    ConsistentHash::weighted(weights).map(HashSpace::Consistent)
}

/// Rendezvous hash over `nodes`, all with weight 1.
pub fn new_rendezvous_hash<N: NodeId>(nodes: impl IntoIterator<Item = N>) -> HashSpace<N> {
    HashSpace::Rendezvous(RendezvousHash::new(nodes))
}

/// Rendezvous hash over the nodes of `weights`.
pub fn new_rendezvous_hash_weighted<N: NodeId>(
    weights: impl IntoIterator<Item = (N, Weight)>,
) -> Result<HashSpace<N>> {
    RendezvousHash::weighted(weights).map(HashSpace::Rendezvous)
}

impl<N, P> HashSpace<N, P> {
    pub fn kind(&self) -> HashKind {
        match self {
            HashSpace::Consistent(_) => HashKind::Consistent,
            HashSpace::Rendezvous(_) => HashKind::Rendezvous,
        }
    }
}

impl<N: NodeId, P: Partitioner> HashSpace<N, P> {
    /// True when both values hold the same shared snapshot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HashSpace::Consistent(a), HashSpace::Consistent(b)) => a.ptr_eq(b),
            (HashSpace::Rendezvous(a), HashSpace::Rendezvous(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<N, P> From<ConsistentHash<N, P>> for HashSpace<N, P> {
    fn from(hash: ConsistentHash<N, P>) -> Self {
        HashSpace::Consistent(hash)
    }
}

impl<N, P> From<RendezvousHash<N, P>> for HashSpace<N, P> {
    fn from(hash: RendezvousHash<N, P>) -> Self {
        HashSpace::Rendezvous(hash)
    }
}

impl<N: NodeId, P: Partitioner> StableHash<N> for HashSpace<N, P> {
    fn get_node(&self, key: &str) -> Option<N> {
        match self {
            HashSpace::Consistent(h) => h.get_node(key),
            HashSpace::Rendezvous(h) => h.get_node(key),
        }
    }

    fn get_nodes(&self, key: &str, size: usize) -> Result<Vec<N>> {
        match self {
            HashSpace::Consistent(h) => h.get_nodes(key, size),
            HashSpace::Rendezvous(h) => h.get_nodes(key, size),
        }
    }

    fn add_node(&self, node: N) -> Self {
        match self {
            HashSpace::Consistent(h) => h.add_node(node).into(),
            HashSpace::Rendezvous(h) => h.add_node(node).into(),
        }
    }

    fn add_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        match self {
            HashSpace::Consistent(h) => h.add_weighted_node(node, weight).map(Into::into),
            HashSpace::Rendezvous(h) => h.add_weighted_node(node, weight).map(Into::into),
        }
    }

    fn update_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        match self {
            HashSpace::Consistent(h) => h.update_weighted_node(node, weight).map(Into::into),
            HashSpace::Rendezvous(h) => h.update_weighted_node(node, weight).map(Into::into),
        }
    }

    fn remove_node(&self, node: &N) -> Self {
        match self {
            HashSpace::Consistent(h) => h.remove_node(node).into(),
            HashSpace::Rendezvous(h) => h.remove_node(node).into(),
        }
    }

    fn node_count(&self) -> usize {
        match self {
            HashSpace::Consistent(h) => h.node_count(),
            HashSpace::Rendezvous(h) => h.node_count(),
        }
    }
}
