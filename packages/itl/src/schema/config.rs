//! YAML schema configuration.
//!
//! ```yaml
//! fields:
//!   Name:
//!     types:
//!       string: String
//!     categories:
//!       Album: true
//!       Movie: true
//!   Release Date:
//!     types:
//!       date: DateTime
//!       integer:
//!         kind: Timestamp
//!         categories:
//!           Album: true
//!     categories:
//!       Album: true
//!       Movie: true
//! ```
//!
//! `types` maps each accepted tag to a [`ValueKind`]. A tag may instead map
//! to `{ kind, categories }` to override the field-level categories for that
//! tag alone.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::core::Schema;
use super::types::{Category, FieldRule, TagRule};
use crate::error::{ItlError, Result};
use crate::value::ValueKind;

/// Schema bundled with the crate.
const DEFAULT_SCHEMA_YAML: &str = include_str!("../../schema/default.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaFile {
    fields: BTreeMap<String, FieldSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSpec {
    types: BTreeMap<String, TagSpec>,
    #[serde(default)]
    categories: BTreeMap<Category, bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagSpec {
    Kind(ValueKind),
    Detailed(DetailedTag),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedTag {
    kind: ValueKind,
    categories: BTreeMap<Category, bool>,
}

impl FieldSpec {
    fn into_rule(self, name: String) -> FieldRule {
        let field_categories = self.categories;
        self.types
            .into_iter()
            .fold(FieldRule::new(name), |rule, (tag, spec)| {
                let tag_rule = match spec {
                    TagSpec::Kind(kind) => TagRule::new(kind, field_categories.clone()),
                    TagSpec::Detailed(detailed) => TagRule::new(detailed.kind, detailed.categories),
                };
                rule.with_rule(tag, tag_rule)
            })
    }
}

/// Parse and validate a schema from YAML text.
///
/// # Examples
/// ```
/// use idi_itl::schema::parse_schema;
///
/// let schema = parse_schema(r#"
/// fields:
///   Name:
///     types: { string: String }
///     categories: { Album: true, Movie: true }
/// "#).unwrap();
/// assert!(schema.field("Name").is_some());
/// ```
pub fn parse_schema(yaml: &str) -> Result<Schema> {
    let file: SchemaFile = serde_yaml_ng::from_str(yaml)?;
    let schema = Schema::new(
        file.fields
            .into_iter()
            .map(|(name, spec)| spec.into_rule(name)),
    )?;
    tracing::debug!(
        fields = schema.len(),
        categories = schema.categories().len(),
        "Loaded schema"
    );
    Ok(schema)
}

/// Read, parse and validate a schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let yaml = fs::read_to_string(path).map_err(|e| {
        ItlError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read schema {}: {e}", path.display()),
        ))
    })?;
    parse_schema(&yaml)
}

/// Build the bundled default ITL schema.
///
/// Each call builds a fresh instance; callers that resolve many records
/// should build it once and share it by reference.
pub fn default_schema() -> Result<Schema> {
    parse_schema(DEFAULT_SCHEMA_YAML)
}
