//! Ring position trait.

use std::fmt::Debug;
use std::hash::Hash;

/// A point on a circular 32-bit key space.
///
/// Positions order the ring; arithmetic between them wraps past the top of
/// the space back to zero.
pub trait Token: Copy + Ord + Hash + Send + Sync + Debug + 'static {
    /// True at the bottom of the key space. A zero distance means two
    /// points coincide.
    fn is_zero(&self) -> bool;
    /// Length of the arc walking up from `self` to `other`, wrapping.
    fn distance_to(&self, other: &Self) -> Self;
}
