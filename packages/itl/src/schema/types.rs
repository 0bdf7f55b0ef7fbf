//! Building blocks of a schema: categories, tag rules and field rules.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Semantic kind of a record (e.g. "Album", "Movie").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How one (field, tag) pairing is parsed and which categories allow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    kind: ValueKind,
    /// Compatible categories with their schema flag.
    ///
    /// The flag is carried through from configuration but never consulted
    /// during category inference.
    categories: BTreeMap<Category, bool>,
}

impl TagRule {
    #[must_use]
    pub fn new(
        kind: ValueKind,
        categories: impl IntoIterator<Item = (impl Into<Category>, bool)>,
    ) -> Self {
        Self {
            kind,
            categories: categories
                .into_iter()
                .map(|(category, flag)| (category.into(), flag))
                .collect(),
        }
    }

    /// Constructor used for values with this tag.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Compatible categories, sorted.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.keys()
    }

    #[must_use]
    pub fn is_compatible(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Schema flag attached to `category`, if it is compatible at all.
    #[must_use]
    pub fn flag(&self, category: &str) -> Option<bool> {
        self.categories.get(category).copied()
    }
}

/// Accepted tags for one field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    name: String,
    tags: BTreeMap<String, TagRule>,
}

impl FieldRule {
    /// Create a rule for `name` accepting no tags yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Accept `tag`, parsed as `kind`, compatible with `categories`.
    ///
    /// # Examples
    /// ```
    /// use idi_itl::schema::FieldRule;
    /// use idi_itl::value::ValueKind;
    ///
    /// let rule = FieldRule::new("Release Date")
    ///     .with_tag("date", ValueKind::DateTime, [("Album", true), ("Movie", true)])
    ///     .with_tag("integer", ValueKind::Timestamp, [("Album", true), ("Movie", true)]);
    /// assert_eq!(rule.tag("integer").unwrap().kind(), ValueKind::Timestamp);
    /// ```
    #[must_use]
    pub fn with_tag(
        mut self,
        tag: impl Into<String>,
        kind: ValueKind,
        categories: impl IntoIterator<Item = (impl Into<Category>, bool)>,
    ) -> Self {
        self.tags.insert(tag.into(), TagRule::new(kind, categories));
        self
    }

    /// Accept `tag` with an existing rule.
    #[must_use]
    pub fn with_rule(mut self, tag: impl Into<String>, rule: TagRule) -> Self {
        self.tags.insert(tag.into(), rule);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule for values using `tag`, if accepted.
    #[must_use]
    pub fn tag(&self, tag: &str) -> Option<&TagRule> {
        self.tags.get(tag)
    }

    /// Accepted tags and their rules, sorted by tag.
    pub fn tags(&self) -> impl Iterator<Item = (&str, &TagRule)> {
        self.tags.iter().map(|(tag, rule)| (tag.as_str(), rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_borrows_as_str() {
        let rule = TagRule::new(ValueKind::String, [("Album", true), ("Movie", false)]);
        assert!(rule.is_compatible("Album"));
        assert!(!rule.is_compatible("Podcast"));
        assert_eq!(rule.flag("Movie"), Some(false));
        assert_eq!(rule.flag("Podcast"), None);
    }

    #[test]
    fn test_tag_rule_categories_sorted() {
        let rule = TagRule::new(ValueKind::String, [("Movie", true), ("Album", true)]);
        let names: Vec<_> = rule.categories().map(Category::as_str).collect();
        assert_eq!(names, ["Album", "Movie"]);
    }

    #[test]
    fn test_field_rule_tags() {
        let rule = FieldRule::new("Name").with_tag("string", ValueKind::String, [("Album", true)]);
        assert_eq!(rule.name(), "Name");
        assert!(rule.tag("string").is_some());
        assert!(rule.tag("integer").is_none());
        assert_eq!(rule.tags().count(), 1);
    }
}
