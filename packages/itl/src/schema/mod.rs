//! Field schema for category inference.
//!
//! A [`Schema`] maps each field name to a [`FieldRule`], which in turn maps
//! every XML tag accepted for that field to a [`TagRule`]: the value kind to
//! construct and the set of [`Category`] labels compatible with that
//! (field, tag) pairing.

mod config;
mod core;
mod types;

pub use config::{default_schema, load_schema, parse_schema};
pub use core::Schema;
pub use types::{Category, FieldRule, TagRule};
