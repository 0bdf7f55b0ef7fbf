//! `<dict>` records and category inference.
//!
//! A record is a `<dict>` of `<key>`/value pairs. Each (field, tag) pair is
//! looked up in the [`Schema`], which yields the value kind to construct and
//! the categories compatible with that pair. The record's category is the
//! single category compatible with every pair; intersection is
//! order-independent, so the result does not depend on field order.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;
use std::slice::ChunksExact;

use serde::{Serialize, Serializer};

use crate::error::{ItlError, Result};
use crate::schema::{Category, Schema};
use crate::value::{key_name, LeafValue, Scalar};
use crate::xml::{ensure_no_attributes, ensure_no_stray_text, ensure_tag, Element};

/// Validate the shape of a `<dict>` and return its children as
/// (key, value) pairs.
///
/// # Errors
/// Structural errors if the element is not an attribute-free `<dict>`, has
/// fewer than two or an odd number of children, or has non-whitespace text
/// around its children.
pub fn dict_pairs(element: &Element) -> Result<ChunksExact<'_, Element>> {
    ensure_no_attributes(element)?;
    ensure_tag(element, "dict")?;
    let count = element.children().len();
    if count < 2 || count % 2 != 0 {
        return Err(ItlError::InvalidArity {
            tag: element.tag().to_string(),
            count,
        });
    }
    ensure_no_stray_text(element)?;
    Ok(element.children().chunks_exact(2))
}

/// Split a pair from [`dict_pairs`] into field name and value element.
pub fn split_pair(pair: &[Element]) -> Result<(String, &Element)> {
    match pair {
        [key, value] => Ok((key_name(key)?, value)),
        _ => Err(ItlError::InvalidArity {
            tag: "dict".to_string(),
            count: pair.len(),
        }),
    }
}

/// Resolves `<dict>` records against a schema.
///
/// The resolver only borrows the schema, so any number of resolvers (on any
/// number of threads) can share one schema instance.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryResolver<'s> {
    schema: &'s Schema,
}

impl<'s> DictionaryResolver<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Parse a `<dict>` record and infer its category.
    ///
    /// # Errors
    /// - structural errors for a malformed `<dict>` or a repeated field
    /// - `UnknownField` / `InvalidFieldTag` for pairs the schema rejects
    /// - structural or content errors from the value constructors
    /// - `NoCompatibleCategory` as soon as the fields contradict each other
    /// - `AmbiguousCategory` if more than one category remains at the end
    ///
    /// # Examples
    /// ```
    /// use idi_itl::dictionary::DictionaryResolver;
    /// use idi_itl::schema::{FieldRule, Schema};
    /// use idi_itl::value::ValueKind;
    /// use idi_itl::xml::Element;
    ///
    /// let schema = Schema::new([
    ///     FieldRule::new("Name").with_tag("string", ValueKind::String, [("Album", true), ("Movie", true)]),
    ///     FieldRule::new("Artist").with_tag("string", ValueKind::String, [("Album", true)]),
    /// ]).unwrap();
    ///
    /// let e = Element::parse(
    ///     "<dict><key>Name</key><string>Foo</string><key>Artist</key><string>Bar</string></dict>",
    /// ).unwrap();
    /// let record = DictionaryResolver::new(&schema).resolve(&e).unwrap();
    /// assert_eq!(record.category().as_str(), "Album");
    /// assert_eq!(record["Artist"].as_str(), Some("Bar"));
    /// ```
    pub fn resolve(&self, element: &Element) -> Result<ResolvedRecord> {
        let mut fields: BTreeMap<String, Scalar> = BTreeMap::new();
        let mut candidates: Option<BTreeSet<&'s Category>> = None;

        for pair in dict_pairs(element)? {
            let (name, value) = split_pair(pair)?;
            if fields.contains_key(&name) {
                return Err(ItlError::DuplicateField(name));
            }

            let rule = self.schema.lookup(&name, value.tag())?;
            let scalar = Scalar::parse(rule.kind(), value)?;

            let remaining = match candidates.take() {
                None => rule.categories().collect(),
                Some(mut set) => {
                    set.retain(|c| rule.is_compatible(c.as_str()));
                    set
                }
            };
            // Intersection only shrinks; an empty set can never recover.
            if remaining.is_empty() {
                return Err(ItlError::NoCompatibleCategory { field: name });
            }
            candidates = Some(remaining);
            fields.insert(name, scalar);
        }

        let candidates: Vec<Category> = candidates
            .unwrap_or_default()
            .into_iter()
            .cloned()
            .collect();
        match <[Category; 1]>::try_from(candidates) {
            Ok([category]) => {
                tracing::debug!(category = %category, fields = fields.len(), "Resolved record");
                Ok(ResolvedRecord { category, fields })
            }
            Err(candidates) => Err(ItlError::AmbiguousCategory { candidates }),
        }
    }
}

/// A `<dict>` record with its inferred category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    category: Category,
    fields: BTreeMap<String, Scalar>,
}

impl ResolvedRecord {
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Value of `field`, if the record has it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&LeafValue> {
        self.fields.get(field).map(Scalar::value)
    }

    /// Value of `field` together with its source element.
    #[must_use]
    pub fn scalar(&self, field: &str) -> Option<&Scalar> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Fields sorted by name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &LeafValue)> {
        self.fields
            .iter()
            .map(|(name, scalar)| (name.as_str(), scalar.value()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Panics if the record has no such field; use [`ResolvedRecord::get`] for
/// fields that may be absent.
impl Index<&str> for ResolvedRecord {
    type Output = LeafValue;

    fn index(&self, field: &str) -> &LeafValue {
        self.fields[field].value()
    }
}

#[derive(Serialize)]
struct RecordView<'a> {
    category: &'a Category,
    fields: BTreeMap<&'a str, &'a LeafValue>,
}

impl Serialize for ResolvedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RecordView {
            category: &self.category,
            fields: self.fields().collect(),
        }
        .serialize(serializer)
    }
}
