//! Consistent hash ring implementation.
//!
//! The ring is generated once by [`RingBuilder`] and never mutated; lookups
//! are a binary search over the sorted points with circular wraparound.

pub mod builder;
pub mod ring;

pub use builder::RingBuilder;
pub use ring::HashRing;
