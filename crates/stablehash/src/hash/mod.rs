//! Immutable hash spaces mapping keys to nodes.
//!
//! A hash space is a snapshot: queries are pure functions of the snapshot
//! and the key, and every mutation returns a new snapshot while the old one
//! stays valid. Snapshots share their state through `Arc`, so they are cheap
//! to clone and can be handed to other threads as-is.

pub mod consistent;
pub mod rendezvous;
pub mod space;

pub use consistent::ConsistentHash;
pub use rendezvous::RendezvousHash;
pub use space::{
    new_consistent_hash, new_consistent_hash_weighted, new_rendezvous_hash,
    new_rendezvous_hash_weighted, HashKind, HashSpace,
};

use crate::error::Result;
use crate::node::{NodeId, Weight};

/// Operations shared by every hash space.
///
/// Mutations never modify `self`; they return the next snapshot. When a
/// mutation changes nothing, the returned snapshot shares `self`'s state.
pub trait StableHash<N: NodeId>: Sized {
    /// Node assigned to `key`, or `None` when the space has no nodes.
    fn get_node(&self, key: &str) -> Option<N>;

    /// `size` distinct nodes assigned to `key`, in preference order.
    ///
    /// Fails with [`Error::InvalidArgument`](crate::Error::InvalidArgument)
    /// when `size` is 0 or exceeds [`node_count`](Self::node_count). Returns
    /// an empty vector when the space cannot supply `size` distinct nodes
    /// for this key.
    fn get_nodes(&self, key: &str, size: usize) -> Result<Vec<N>>;

    /// Same as `add_weighted_node(node, 1)`.
    fn add_node(&self, node: N) -> Self;

    /// Adds `node` with `weight`. A node that is already present is left
    /// untouched whatever `weight` is: adding is not an upsert.
    fn add_weighted_node(&self, node: N, weight: Weight) -> Result<Self>;

    /// Sets the weight of `node`, adding it when absent. No-op when the node
    /// already has `weight`.
    ///
    /// On a [`ConsistentHash`](crate::ConsistentHash) an absent node joins the
    /// node list and receives ring points. Stablehash clients on other
    /// platforms only record the weight there, leaving the node off the ring,
    /// so placements diverge after such an update.
    fn update_weighted_node(&self, node: N, weight: Weight) -> Result<Self>;

    /// Removes `node`. No-op when absent.
    fn remove_node(&self, node: &N) -> Self;

    /// Number of distinct registered nodes.
    fn node_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}
