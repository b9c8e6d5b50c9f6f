//! Pre-condition checks run before any hashing entry point.
//!
//! Null keys and nodes cannot be expressed with `&str` and owned node
//! values, so only numeric arguments need checking here.

use crate::error::{Error, Result};
use crate::node::Weight;

/// Argument checks shared by every hash space implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// `get_nodes` size must be within `1..=node_count`.
    pub fn validate_size(&self, size: usize, node_count: usize) -> Result<()> {
        if size < 1 || size > node_count {
            return Err(Error::invalid_argument(format!(
                "size outside of expected range (1, {}): {}",
                node_count, size
            )));
        }
        Ok(())
    }

    /// Node weights must be positive.
    pub fn validate_weight(&self, weight: Weight) -> Result<()> {
        if weight == 0 {
            return Err(Error::invalid_argument(format!(
                "invalid weight value: {}; should be > 0",
                weight
            )));
        }
        Ok(())
    }

    pub fn validate_weights<'a>(&self, weights: impl IntoIterator<Item = &'a Weight>) -> Result<()> {
        weights
            .into_iter()
            .try_for_each(|weight| self.validate_weight(*weight))
    }
}
