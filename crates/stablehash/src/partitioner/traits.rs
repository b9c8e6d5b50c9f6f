//! Key fingerprinting.

use crate::token::HashKey;

/// Turns a string key into one or more [`HashKey`] positions.
///
/// Ring replicas and lookup keys go through the same partitioner, so a
/// snapshot and every clone of it must share one. Implementations hold no
/// mutable state.
pub trait Partitioner: Send + Sync + 'static {
    /// Lazy, finite sequence of ring points derived from one key.
    ///
    /// The sequence is restartable: calling [`points`](Self::points) again
    /// with the same key yields the same values.
    type Points: Iterator<Item = HashKey>;

    /// Derives every ring point available for `key`, in digest order.
    fn points(&self, key: &str) -> Self::Points;

    /// The representative point of `key`: the first element of
    /// [`points`](Self::points).
    fn partition(&self, key: &str) -> HashKey;

    /// Short identifier, recorded in logs.
    fn name(&self) -> &'static str;
}
