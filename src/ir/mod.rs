//! Layer expression data model.
//!
//! Every type here is immutable once built and `Send + Sync`, so compiled
//! trees can be shared across threads without copying.

pub(crate) mod geometry;
pub(crate) mod layer;
pub(crate) mod paint;
pub(crate) mod path;
pub(crate) mod pretty;
