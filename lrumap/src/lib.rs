#![doc = include_str!("../../README.md")]
#![deny(missing_docs)]
#![cfg_attr(all(doc, ENABLE_DOC_AUTO_CFG), feature(doc_auto_cfg))]

mod error;
mod linked;
mod list;
mod lru;
mod ptr;
mod table;

pub use error::{
    Error,
    Result,
};
pub use linked::{
    IntoIter,
    Iter,
    LinkedHashMap,
};
pub use list::{
    Coupled,
    DualList,
    ListIntoIter,
    ListIter,
    ListIterRev,
    Removed,
};
pub use lru::LruCache;
pub use ptr::Ptr;
pub use table::{
    BucketedMap,
    DEFAULT_BUCKETS,
    RemovedEntry,
};

/// Default hash builder for every map in the crate.
///
/// `std::hash::RandomState` unless the `ahash` feature is enabled, in which
/// case it is `ahash::RandomState`.
#[cfg(not(feature = "ahash"))]
pub type RandomState = std::hash::RandomState;
/// Default hash builder for every map in the crate.
///
/// `std::hash::RandomState` unless the `ahash` feature is enabled, in which
/// case it is `ahash::RandomState`.
#[cfg(feature = "ahash")]
pub type RandomState = ahash::RandomState;

mod private {
    pub trait Sealed {}
}
