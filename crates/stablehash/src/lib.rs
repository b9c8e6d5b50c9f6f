//! Stable key-to-node assignment.
//!
//! This crate maps string keys to nodes from a changing node set so that
//! adding or removing a node moves only a small share of keys. Two schemes
//! are provided:
//! - Weighted consistent hashing over a virtual-node ring
//! - Weighted rendezvous (highest random weight) hashing
//!
//! Every hash space is an immutable snapshot. Mutations return a new
//! snapshot and leave the old one usable, so readers never need locks:
//!
//! ```
//! use stablehash::{new_consistent_hash, StableHash};
//!
//! let ring = new_consistent_hash(["a", "b", "c"]);
//! assert_eq!(ring.get_node("test"), Some("a"));
//!
//! let bigger = ring.add_node("d");
//! assert_eq!(ring.node_count(), 3);
//! assert_eq!(bigger.get_nodes("test", 2).unwrap(), vec!["a", "b"]);
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod node;
pub mod partitioner;
pub mod rendezvous;
pub mod ring;
pub mod token;
pub mod validation;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use hash::{
    new_consistent_hash, new_consistent_hash_weighted, new_rendezvous_hash,
    new_rendezvous_hash_weighted, ConsistentHash, HashKind, HashSpace, RendezvousHash, StableHash,
};
pub use node::{NodeId, Weight};
pub use partitioner::{Md5Partitioner, Partitioner, SipPartitioner};
pub use rendezvous::RendezvousEngine;
pub use ring::{HashRing, RingBuilder};
pub use token::{HashKey, Token};
pub use validation::InputValidator;
pub use vnode::VirtualNode;
