use crate::Ptr;

/// Errors reported by the positional and keyed accessors.
///
/// Every variant describes a broken calling contract rather than a transient
/// condition, and the structure that reported it is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The position is the end marker or names a slot with no live node.
    #[error("position {0:?} does not refer to a live node")]
    InvalidPosition(Ptr),

    /// Direct keyed access on a key that is not present.
    #[error("key not found")]
    MissingKey,

    /// A cache was constructed with a capacity of zero.
    #[error("cache capacity must be greater than zero")]
    InvalidCapacity,
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
