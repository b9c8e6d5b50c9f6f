//! Deterministic generation of the virtual-node ring.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::RingConfig;
use crate::node::{NodeId, Weight, DEFAULT_WEIGHT};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::ring::HashRing;
use crate::vnode::VirtualNode;

/// Builds a [`HashRing`] from a node list and per-node weights.
///
/// The same node list, weight map, partitioner and config always produce
/// the same ring.
#[derive(Debug)]
pub struct RingBuilder<P = Md5Partitioner> {
    partitioner: Arc<P>,
    config: RingConfig,
}

impl<P> Clone for RingBuilder<P> {
    fn clone(&self) -> Self {
        Self {
            partitioner: Arc::clone(&self.partitioner),
            config: self.config,
        }
    }
}

impl RingBuilder<Md5Partitioner> {
    pub fn new() -> Self {
        Self::with_partitioner(Arc::new(Md5Partitioner))
    }
}

impl Default for RingBuilder<Md5Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    pub fn with_partitioner(partitioner: Arc<P>) -> Self {
        Self {
            partitioner,
            config: RingConfig::default(),
        }
    }

    /// Overrides the default (reference-compatible) ring parameters.
    ///
    /// The config is expected to have passed [`RingConfig::validate`].
    pub fn with_config(mut self, config: RingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Number of replicas node `weight` gets on a ring of `total_nodes`
    /// list entries whose weights sum to `total_weight`.
    ///
    /// `floor(replicas_per_node * total_nodes * weight / total_weight)`.
    pub fn replica_factor(&self, weight: Weight, total_nodes: usize, total_weight: u64) -> u32 {
        if total_weight == 0 {
            return 0;
        }
        let scaled = u64::from(self.config.replicas_per_node) * total_nodes as u64 * u64::from(weight);
        u32::try_from(scaled / total_weight).unwrap_or(u32::MAX)
    }

    /// Generates the ring for `nodes`.
    ///
    /// Nodes missing from `weights` get [`DEFAULT_WEIGHT`]. Duplicate list
    /// entries are not removed: each occurrence counts towards the totals and
    /// generates its own replicas. When two points collide, the owner
    /// inserted later wins.
    pub fn build<N: NodeId>(&self, nodes: &[N], weights: &HashMap<N, Weight>) -> HashRing<N, P> {
        let weight_of = |node: &N| weights.get(node).copied().unwrap_or(DEFAULT_WEIGHT);

        let total_weight: u64 = nodes.iter().map(|n| u64::from(weight_of(n))).sum();
        let total_nodes = nodes.len();

        let mut owners: HashMap<_, N> = HashMap::new();
        let mut sorted_keys = Vec::new();

        for node in nodes {
            let factor = self.replica_factor(weight_of(node), total_nodes, total_weight);
            for replica in 0..factor {
                let vnodes = VirtualNode::from_replica(
                    self.partitioner.as_ref(),
                    node,
                    replica,
                    self.config.points_per_replica,
                );
                for vnode in vnodes {
                    sorted_keys.push(vnode.token);
                    owners.insert(vnode.token, vnode.node);
                }
            }
        }
        sorted_keys.sort_unstable();

        debug!(
            nodes = total_nodes,
            points = sorted_keys.len(),
            partitioner = self.partitioner.name(),
            "built hash ring"
        );

        HashRing::from_parts(Arc::clone(&self.partitioner), sorted_keys, owners)
    }
}
