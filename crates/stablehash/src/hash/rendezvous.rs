//! Rendezvous hash snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::hash::StableHash;
use crate::node::{NodeId, Weight, DEFAULT_WEIGHT};
use crate::partitioner::{Md5Partitioner, Partitioner};
use crate::rendezvous::RendezvousEngine;
use crate::validation::InputValidator;

/// Rendezvous hash snapshot over a node → weight map.
///
/// Weights passed to [`weighted`](Self::weighted) are used for scoring.
/// Nodes added or updated afterwards are always stored with weight 1,
/// whatever weight is requested. Placement compatibility depends on this.
pub struct RendezvousHash<N, P = Md5Partitioner> {
    engine: RendezvousEngine<P>,
    validator: InputValidator,
    nodes: Arc<BTreeMap<N, Weight>>,
}

impl<N: NodeId> RendezvousHash<N> {
    /// Space over `nodes`, all with weight 1. Duplicates collapse.
    pub fn new(nodes: impl IntoIterator<Item = N>) -> Self {
        Self::with_partitioner(Md5Partitioner, nodes)
    }

    /// Space over the nodes of `weights`, scored with those weights.
    pub fn weighted(weights: impl IntoIterator<Item = (N, Weight)>) -> Result<Self> {
        Self::weighted_with_partitioner(Md5Partitioner, weights)
    }
}

impl<N: NodeId, P: Partitioner> RendezvousHash<N, P> {
    pub fn with_partitioner(partitioner: P, nodes: impl IntoIterator<Item = N>) -> Self {
        let nodes = nodes.into_iter().map(|n| (n, DEFAULT_WEIGHT)).collect();
        Self::from_parts(RendezvousEngine::new(Arc::new(partitioner)), nodes)
    }

    pub fn weighted_with_partitioner(
        partitioner: P,
        weights: impl IntoIterator<Item = (N, Weight)>,
    ) -> Result<Self> {
        let nodes: BTreeMap<N, Weight> = weights.into_iter().collect();
        InputValidator.validate_weights(nodes.values())?;
        Ok(Self::from_parts(RendezvousEngine::new(Arc::new(partitioner)), nodes))
    }

    fn from_parts(engine: RendezvousEngine<P>, nodes: BTreeMap<N, Weight>) -> Self {
        debug!(
            nodes = nodes.len(),
            partitioner = engine.partitioner().name(),
            "built rendezvous space"
        );
        Self {
            engine,
            validator: InputValidator,
            nodes: Arc::new(nodes),
        }
    }

    fn with_nodes(&self, nodes: BTreeMap<N, Weight>) -> Self {
        Self::from_parts(self.engine.clone(), nodes)
    }

    /// Stores `node` with the fixed weight 1.
    fn store_unit_weight(&self, node: N) -> Self {
        let mut nodes = self.nodes.as_ref().clone();
        nodes.insert(node, DEFAULT_WEIGHT);
        self.with_nodes(nodes)
    }

    /// Score of `node` for `key`, `None` when the node is not registered.
    pub fn score(&self, key: &str, node: &N) -> Option<f64> {
        self.nodes
            .get(node)
            .map(|weight| self.engine.score(key, node, *weight))
    }

    pub fn weights(&self) -> &BTreeMap<N, Weight> {
        &self.nodes
    }

    pub fn weight_of(&self, node: &N) -> Option<Weight> {
        self.nodes.get(node).copied()
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.engine.partitioner().name()
    }

    /// True when both snapshots share the same node map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }
}

impl<N: NodeId, P: Partitioner> StableHash<N> for RendezvousHash<N, P> {
    fn get_node(&self, key: &str) -> Option<N> {
        self.engine.pick_one(&self.nodes, key).cloned()
    }

    fn get_nodes(&self, key: &str, size: usize) -> Result<Vec<N>> {
        self.validator.validate_size(size, self.nodes.len())?;
        Ok(self
            .engine
            .pick_top_k(&self.nodes, key, size)
            .into_iter()
            .cloned()
            .collect())
    }

    fn add_node(&self, node: N) -> Self {
        if self.nodes.contains_key(&node) {
            trace!(%node, "node already registered");
            return self.clone();
        }
        debug!(%node, "adding node");
        self.store_unit_weight(node)
    }

    fn add_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        self.validator.validate_weight(weight)?;
        Ok(self.add_node(node))
    }

    fn update_weighted_node(&self, node: N, weight: Weight) -> Result<Self> {
        self.validator.validate_weight(weight)?;
        if self.nodes.get(&node) == Some(&DEFAULT_WEIGHT) {
            trace!(%node, "weight unchanged");
            return Ok(self.clone());
        }
        debug!(%node, requested = weight, "resetting node weight");
        Ok(self.store_unit_weight(node))
    }

    fn remove_node(&self, node: &N) -> Self {
        if !self.nodes.contains_key(node) {
            trace!(%node, "node not registered");
            return self.clone();
        }
        let mut nodes = self.nodes.as_ref().clone();
        nodes.remove(node);
        debug!(%node, "removing node");
        self.with_nodes(nodes)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<N, P> Clone for RendezvousHash<N, P> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            validator: self.validator,
            nodes: Arc::clone(&self.nodes),
        }
    }
}

impl<N: fmt::Debug, P> fmt::Debug for RendezvousHash<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendezvousHash")
            .field("nodes", &self.nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_keys() {
        let hash = RendezvousHash::new(["a", "b", "c"]);
        assert_eq!(hash.get_node("test"), Some("b"));
        assert_eq!(hash.get_node("test2"), Some("a"));
        assert_eq!(hash.get_node("test4"), Some("c"));
    }

    #[test]
    fn test_weighted_constructor_keeps_weights() {
        let hash = RendezvousHash::weighted([("a", 1), ("b", 3), ("c", 1)]).unwrap();
        assert_eq!(hash.weight_of(&"b"), Some(3));
        assert_eq!(hash.get_node("bbbb"), Some("b"));
        assert_eq!(hash.get_nodes("test2", 3).unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_added_weight_is_always_one() {
        let hash = RendezvousHash::new(["a", "b"]).add_weighted_node("c", 7).unwrap();
        assert_eq!(hash.weight_of(&"c"), Some(1));

        let weighted = RendezvousHash::weighted([("a", 4)]).unwrap();
        let updated = weighted.update_weighted_node("a", 9).unwrap();
        assert_eq!(updated.weight_of(&"a"), Some(1));
        assert_eq!(weighted.weight_of(&"a"), Some(4));
    }

    #[test]
    fn test_noops_share_state() {
        let hash = RendezvousHash::new(["a", "b", "c"]);
        assert!(hash.add_node("a").ptr_eq(&hash));
        assert!(hash.add_weighted_node("a", 3).unwrap().ptr_eq(&hash));
        assert!(hash.update_weighted_node("a", 3).unwrap().ptr_eq(&hash));
        assert!(hash.remove_node(&"z").ptr_eq(&hash));
    }

    #[test]
    fn test_score_only_for_registered() {
        let hash = RendezvousHash::new(["a"]);
        assert!(hash.score("test", &"a").is_some());
        assert!(hash.score("test", &"b").is_none());
    }

    #[test]
    fn test_validation() {
        let hash = RendezvousHash::new(["a", "b", "c"]);
        assert!(hash.get_nodes("test", 0).is_err());
        assert!(hash.get_nodes("test", 4).is_err());
        assert!(hash.add_weighted_node("d", 0).is_err());
        assert!(RendezvousHash::weighted([("a", 0)]).is_err());
    }

    #[test]
    fn test_empty() {
        let hash = RendezvousHash::<String>::new(Vec::new());
        assert_eq!(hash.get_node("test"), None);
        assert!(hash.get_nodes("test", 1).is_err());
    }
}
