//! idi ITL - Parse exported iTunes library XML into typed records.
//!
//! This crate reads the plist-style XML vocabulary of an exported library,
//! turns leaf elements into typed values and infers the category of each
//! track record (album track, movie, TV show, ...) from the fields it
//! contains, using a configurable schema.
//!
//! # Example
//!
//! ```
//! use idi_itl::dictionary::DictionaryResolver;
//! use idi_itl::schema::default_schema;
//! use idi_itl::xml::Element;
//!
//! let schema = default_schema().unwrap();
//! let record = Element::parse(
//!     "<dict><key>Name</key><string>Pilot</string><key>Series</key><string>Show</string></dict>",
//! )
//! .unwrap();
//!
//! let resolved = DictionaryResolver::new(&schema).resolve(&record).unwrap();
//! assert_eq!(resolved.category().as_str(), "TV Show");
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Configuration constants and content grammars
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Owned element tree and element-shape checks
//! - [`value`]: Leaf value kinds and their constructors
//! - [`schema`]: Field/tag/category rules and YAML loading
//! - [`dictionary`]: Record resolution and category inference
//! - [`library`]: Whole-document loading
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod library;
pub mod schema;
pub mod value;
pub mod xml;

// Re-export commonly used items
pub use dictionary::{DictionaryResolver, ResolvedRecord};
pub use error::{ErrorKind, ItlError, Result};
pub use library::{load_file, Library, OnError, Track};
pub use schema::{default_schema, Category, Schema};
pub use value::{LeafValue, ValueKind};
