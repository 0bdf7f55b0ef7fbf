//! Typed leaf values parsed from plist elements.
//!
//! [`ValueKind`] is the dispatch key: it selects the constructor for an
//! element and is what schemas store per (field, tag) pair. [`LeafValue`] is
//! the closed set of decoded payloads.

mod kind;
mod leaf;

pub use kind::{ConstructorFn, ValueKind};
pub use leaf::{LeafValue, Scalar};

pub(crate) use leaf::key_name;
