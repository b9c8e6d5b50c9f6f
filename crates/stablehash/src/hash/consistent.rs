//! Weighted consistent hashing over an immutable virtual-node ring.
//!
//! The ring layout is compatible with the ketama-style memcached clients
//! (MD5 points, 40 replicas per node of average weight, 3 points per
//! replica), so the same node list places keys identically.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::RingConfig;
use crate::error::Result;
use crate::hash::StableHash;
use crate::node::{NodeId, Weight, DEFAULT_WEIGHT};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::ring::{HashRing, RingBuilder};
use crate::token::HashKey;
use crate::validation::InputValidator;

/// Consistent hash snapshot.
///
/// Holds the registered node list (in registration order, duplicates kept),
/// the explicit weights, and the ring generated from them. Nodes without an
/// explicit weight count as weight 1.
pub struct ConsistentHash<N, P = Md5Partitioner> {
    builder: RingBuilder<P>,
    validator: InputValidator,
    nodes: Arc<Vec<N>>,
    weights: Arc<HashMap<N, Weight>>,
    ring: Arc<HashRing<N, P>>,
    distinct: usize,
}

impl<N: NodeId> ConsistentHash<N> {
    /// Ring over `nodes`, all with weight 1.
    pub fn new(nodes: impl IntoIterator<Item = N>) -> Self {
        Self::with_partitioner(Md5Partitioner, nodes)
    }

    /// Ring over the nodes of `weights`.
    ///
    /// The iteration order of `weights` becomes the registration order. A
    /// node listed twice keeps its first position and its last weight.
    pub fn weighted(weights: impl IntoIterator<Item = (N, Weight)>) -> Result<Self> {
        Self::weighted_with_partitioner(Md5Partitioner, weights)
    }

    /// Weighted ring generated with non-default parameters.
    pub fn with_config(
        config: RingConfig,
        weights: impl IntoIterator<Item = (N, Weight)>,
    ) -> Result<Self> {
        config.validate()?;
        let builder = RingBuilder::new().with_config(config);
        let (nodes, weights) = collect_weighted(weights);
        InputValidator.validate_weights(weights.values())?;
        Ok(Self::from_parts(builder, nodes, weights))
    }
}

impl<N: NodeId, P: Partitioner> ConsistentHash<N, P> {
    pub fn with_partitioner(partitioner: P, nodes: impl IntoIterator<Item = N>) -> Self {
        let builder = RingBuilder::with_partitioner(Arc::new(partitioner));
        Self::from_parts(builder, nodes.into_iter().collect(), HashMap::new())
    }

    pub fn weighted_with_partitioner(
        partitioner: P,
        weights: impl IntoIterator<Item = (N, Weight)>,
    ) -> Result<Self> {
        let (nodes, weights) = collect_weighted(weights);
        InputValidator.validate_weights(weights.values())?;
        let builder = RingBuilder::with_partitioner(Arc::new(partitioner));
        Ok(Self::from_parts(builder, nodes, weights))
    }

    fn from_parts(builder: RingBuilder<P>, nodes: Vec<N>, weights: HashMap<N, Weight>) -> Self {
        let ring = builder.build(&nodes, &weights);
        let distinct = nodes.iter().collect::<HashSet<_>>().len();
        Self {
            builder,
            validator: InputValidator,
            nodes: Arc::new(nodes),
            weights: Arc::new(weights),
            ring: Arc::new(ring),
            distinct,
        }
    }

    fn rebuild(&self, nodes: Vec<N>, weights: HashMap<N, Weight>) -> Self {
        Self::from_parts(self.builder.clone(), nodes, weights)
    }

    /// Replaces every weight at once.
    ///
    /// The node list becomes the nodes of `weights`. Returns the current
    /// snapshot when the effective weights are unchanged.
    pub fn update_weights(&self, weights: impl IntoIterator<Item = (N, Weight)>) -> Result<Self> {
        let (nodes, weights) = collect_weighted(weights);
        self.validator.validate_weights(weights.values())?;

        let unchanged = weights.len() == self.distinct
            && weights.iter().all(|(node, w)| self.weight_of(node) == Some(*w));
        if unchanged {
            trace!("weights unchanged, keeping ring");
            return Ok(self.clone());
        }
        debug!(nodes = nodes.len(), "replacing all weights");
        Ok(self.rebuild(nodes, weights))
    }

    /// Effective weight of `node`, `None` when it is not registered.
    pub fn weight_of(&self, node: &N) -> Option<Weight> {
        if self.nodes.contains(node) {
            Some(self.weights.get(node).copied().unwrap_or(DEFAULT_WEIGHT))
        } else {
            None
        }
    }

    /// Registered nodes in registration order, duplicates included.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn ring(&self) -> &HashRing<N, P> {
        &self.ring
    }

    pub fn config(&self) -> &RingConfig {
        self.builder.config()
    }

    pub fn point_count(&self) -> usize {
        self.ring.point_count()
    }

    /// Number of distinct nodes that own at least one ring point. Lower than
    /// [`node_count`](StableHash::node_count) when a light node's replica
    /// factor floors to zero.
    pub fn owner_count(&self) -> usize {
        self.ring.owner_count()
    }

    /// Ring points in ascending order with their owners.
    pub fn points(&self) -> impl Iterator<Item = (HashKey, &N)> + '_ {
        self.ring.points()
    }

    /// Share of the key space owned by each node.
    pub fn ownership(&self) -> HashMap<N, f64> {
        self.ring.ownership()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.ring.partitioner_name()
    }

    /// True when both snapshots share the same ring.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ring, &other.ring)
    }
}

impl<N: NodeId, P: Partitioner> StableHash<N> for ConsistentHash<N, P> {
    fn get_node(&self, key: &str) -> Option<N> {
        self.ring.get_node(key).cloned()
    }

    fn get_nodes(&self, key: &str, size: usize) -> Result<Vec<N>> {
        self.validator.validate_size(size, self.distinct)?;
        Ok(self.ring.get_nodes(key, size).into_iter().cloned().collect())
    }

    fn add_node(&self, node: N) -> Self {
        self.insert(node, DEFAULT_WEIGHT)
    }

    fn add_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        self.validator.validate_weight(weight)?;
        Ok(self.insert(node, weight))
    }

    fn update_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        self.validator.validate_weight(weight)?;

        if self.weight_of(&node) == Some(weight) {
            trace!(%node, weight, "weight unchanged");
            return Ok(self.clone());
        }

        let mut nodes = self.nodes.as_ref().clone();
        if !nodes.contains(&node) {
            nodes.push(node.clone());
        }
        let mut weights = self.weights.as_ref().clone();
        weights.insert(node.clone(), weight);

        debug!(%node, weight, "updating node weight");
        Ok(self.rebuild(nodes, weights))
    }

    fn remove_node(&self, node: &N) -> Self {
        let Some(index) = self.nodes.iter().position(|n| n == node) else {
            trace!(%node, "node not registered");
            return self.clone();
        };

        let mut nodes = self.nodes.as_ref().clone();
        nodes.remove(index);
        let mut weights = self.weights.as_ref().clone();
        weights.remove(node);

        debug!(%node, "removing node");
        self.rebuild(nodes, weights)
    }

    fn node_count(&self) -> usize {
        self.distinct
    }
}

impl<N: NodeId, P: Partitioner> ConsistentHash<N, P> {
    fn insert(&self, node: N, weight: Weight) -> Self {
        if self.nodes.contains(&node) {
            trace!(%node, "node already registered");
            return self.clone();
        }

        let mut nodes = self.nodes.as_ref().clone();
        nodes.push(node.clone());
        let mut weights = self.weights.as_ref().clone();
        weights.insert(node.clone(), weight);

        debug!(%node, weight, "adding node");
        self.rebuild(nodes, weights)
    }
}

/// Splits weighted pairs into a registration-ordered node list and a
/// weight map.
fn collect_weighted<N: NodeId>(
    pairs: impl IntoIterator<Item = (N, Weight)>,
) -> (Vec<N>, HashMap<N, Weight>) {
    let mut nodes = Vec::new();
    let mut weights = HashMap::new();
    for (node, weight) in pairs {
        if weights.insert(node.clone(), weight).is_none() {
            nodes.push(node);
        }
    }
    (nodes, weights)
}

impl<N, P> Clone for ConsistentHash<N, P> {
    fn clone(&self) -> Self {
        Self {
            builder: self.builder.clone(),
            validator: self.validator,
            nodes: Arc::clone(&self.nodes),
            weights: Arc::clone(&self.weights),
            ring: Arc::clone(&self.ring),
            distinct: self.distinct,
        }
    }
}

impl<N: fmt::Debug, P> fmt::Debug for ConsistentHash<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsistentHash")
            .field("nodes", &self.nodes)
            .field("weights", &self.weights)
            .field("ring", &self.ring)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> ConsistentHash<&'static str> {
        ConsistentHash::new(["a", "b", "c"])
    }

    #[test]
    fn test_get_node_reference_keys() {
        let hash = abc();
        assert_eq!(hash.get_node("test"), Some("a"));
        assert_eq!(hash.get_node("test1"), Some("b"));
        assert_eq!(hash.get_node("aaaa"), Some("b"));
        assert_eq!(hash.get_node("bbbb"), Some("a"));
        assert_eq!(hash.get_nodes("test", 2).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_add_existing_is_noop_whatever_weight() {
        let hash = abc();
        let same = hash.add_weighted_node("b", 5).unwrap();
        assert!(same.ptr_eq(&hash));
        assert_eq!(same.weight_of(&"b"), Some(1));
    }

    #[test]
    fn test_update_unchanged_weight_is_noop() {
        let hash = abc();
        // implicit weight 1
        assert!(hash.update_weighted_node("a", 1).unwrap().ptr_eq(&hash));
        let updated = hash.update_weighted_node("a", 2).unwrap();
        assert!(!updated.ptr_eq(&hash));
        assert!(updated.update_weighted_node("a", 2).unwrap().ptr_eq(&updated));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let hash = abc();
        assert!(hash.remove_node(&"z").ptr_eq(&hash));
    }

    #[test]
    fn test_old_snapshot_survives_mutation() {
        let hash = abc();
        let smaller = hash.remove_node(&"b");
        assert_eq!(hash.node_count(), 3);
        assert_eq!(smaller.node_count(), 2);
        assert_eq!(hash.get_node("test1"), Some("b"));
        assert_eq!(smaller.get_node("test1"), Some("c"));
    }

    #[test]
    fn test_update_absent_node_registers_it() {
        let hash = ConsistentHash::new(["a", "c"]).update_weighted_node("b", 2).unwrap();
        assert_eq!(hash.nodes(), &["a", "c", "b"]);
        assert_eq!(hash.weight_of(&"b"), Some(2));
        assert_eq!(hash.get_node("test"), Some("b"));
    }

    #[test]
    fn test_update_weights() {
        let hash = ConsistentHash::weighted([("a", 1), ("b", 2), ("c", 1)]).unwrap();
        let same = hash.update_weights([("c", 1), ("b", 2), ("a", 1)]).unwrap();
        assert!(same.ptr_eq(&hash));

        let changed = hash.update_weights([("a", 1), ("b", 1), ("c", 1)]).unwrap();
        assert!(!changed.ptr_eq(&hash));
        assert_eq!(changed.get_node("test"), abc().get_node("test"));
        assert!(hash.update_weights([("a", 0)]).is_err());
    }

    #[test]
    fn test_zero_weight_rejected() {
        assert!(ConsistentHash::weighted([("a", 0)]).is_err());
        assert!(abc().add_weighted_node("d", 0).is_err());
        assert!(abc().update_weighted_node("a", 0).is_err());
    }

    #[test]
    fn test_size_validation() {
        let hash = abc();
        assert!(hash.get_nodes("test", 0).is_err());
        assert!(hash.get_nodes("test", 4).is_err());
        assert_eq!(hash.get_nodes("test", 3).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_space() {
        let hash = ConsistentHash::<String>::new(Vec::new());
        assert!(hash.is_empty());
        assert_eq!(hash.get_node("test"), None);
        assert!(hash.get_nodes("test", 1).is_err());
    }

    #[test]
    fn test_node_without_points_makes_selection_unsatisfiable() {
        // 40 * 2 * 1 / 1001 floors to zero replicas for "a"
        let hash = ConsistentHash::weighted([("a", 1), ("b", 1000)]).unwrap();
        assert_eq!(hash.point_count(), 237);
        assert_eq!(hash.node_count(), 2);
        assert_eq!(hash.owner_count(), 1);
        assert_eq!(hash.get_node("test"), Some("b"));
        assert_eq!(hash.get_nodes("test", 2).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn test_custom_config() {
        let config = RingConfig {
            replicas_per_node: 10,
            points_per_replica: 1,
        };
        let hash = ConsistentHash::with_config(config, [("a", 1), ("b", 1)]).unwrap();
        assert_eq!(hash.point_count(), 20);
        assert_eq!(hash.config(), &config);

        let bad = RingConfig {
            points_per_replica: 0,
            ..config
        };
        assert!(ConsistentHash::with_config(bad, [("a", 1)]).is_err());
    }

    #[test]
    fn test_ownership_covers_ring() {
        let shares = abc().ownership();
        assert_eq!(shares.len(), 3);
        let total: f64 = shares.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(shares.values().all(|s| *s > 0.15 && *s < 0.5));
    }

    #[test]
    fn test_sip_partitioner() {
        use crate::partitioner::SipPartitioner;
        let hash = ConsistentHash::with_partitioner(SipPartitioner::default(), ["a", "b", "c"]);
        assert_eq!(hash.partitioner_name(), "SipPartitioner");
        // two points per replica available, three requested
        assert_eq!(hash.point_count(), 3 * 40 * 2);
        assert!(hash.get_node("test").is_some());
    }
}
