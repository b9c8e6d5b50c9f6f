//! Node abstractions for the stable hash spaces.
//!
//! Nodes are the participants keys are assigned to. Any type that is cheap
//! to clone, comparable, hashable and printable can act as a node; the
//! printed form is what gets hashed, so it must be stable across processes.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Relative capacity of a node. Must be positive.
pub type Weight = u32;

/// Weight assumed for nodes registered without one.
pub const DEFAULT_WEIGHT: Weight = 1;

/// Identifier of a node participating in a hash space.
///
/// Blanket-implemented for every type with the required capabilities, so
/// `String`, `&'static str`, integers and custom newtypes all qualify.
/// `Ord` is only used to break ties deterministically.
pub trait NodeId: Clone + Eq + Hash + Ord + Display + Debug + Send + Sync + 'static {}

impl<T> NodeId for T where T: Clone + Eq + Hash + Ord + Display + Debug + Send + Sync + 'static {}
