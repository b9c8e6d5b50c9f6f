//! Error types for the stable hash library.

/// Result type alias for the stable hash library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the stable hash library.
///
/// An empty ring is not an error: lookups against a space with no nodes
/// return `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Caller contract violation (non-positive weight, out-of-range size).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Ring configuration rejected by [`RingConfig::validate`](crate::RingConfig::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
