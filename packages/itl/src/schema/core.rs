//! Validated, immutable schema.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{Category, FieldRule, TagRule};
use crate::error::{ItlError, Result};

/// Field name → accepted tags, value kinds and compatible categories.
///
/// A schema is validated once by [`Schema::new`] and never changes
/// afterwards, so one instance can be shared by reference between any number
/// of concurrent resolutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<String, FieldRule>,
}

impl Schema {
    /// Build a schema from field rules.
    ///
    /// # Errors
    /// Returns `InvalidSchema` if a field name is blank, padded with
    /// whitespace or repeated, if a field accepts no tags, if a tag cannot
    /// produce the value kind assigned to it, or if a (field, tag) pair has
    /// no compatible category.
    pub fn new(rules: impl IntoIterator<Item = FieldRule>) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for rule in rules {
            validate_field(&rule)?;
            let name = rule.name().to_string();
            if fields.insert(name.clone(), rule).is_some() {
                return Err(ItlError::InvalidSchema(format!(
                    "field '{name}' is defined more than once"
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Rule for `field`, if known.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    /// Rule for a value of `field` written with `tag`.
    ///
    /// # Errors
    /// `UnknownField` if the field is not in the schema, `InvalidFieldTag`
    /// if the field does not accept `tag`.
    pub fn lookup(&self, field: &str, tag: &str) -> Result<&TagRule> {
        let rule = self
            .field(field)
            .ok_or_else(|| ItlError::UnknownField(field.to_string()))?;
        rule.tag(tag).ok_or_else(|| ItlError::InvalidFieldTag {
            field: field.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Field rules, sorted by field name.
    pub fn fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.values()
    }

    /// Every category mentioned anywhere in the schema.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<&Category> {
        self.fields
            .values()
            .flat_map(FieldRule::tags)
            .flat_map(|(_, rule)| rule.categories())
            .collect()
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

fn validate_field(rule: &FieldRule) -> Result<()> {
    let name = rule.name();
    if name.trim().is_empty() {
        return Err(ItlError::InvalidSchema("field name is blank".to_string()));
    }
    // Keys are trimmed before lookup, so a padded name could never match.
    if name.trim() != name {
        return Err(ItlError::InvalidSchema(format!(
            "field name '{name}' has leading or trailing whitespace"
        )));
    }
    if rule.tags().next().is_none() {
        return Err(ItlError::InvalidSchema(format!(
            "field '{name}' accepts no tags"
        )));
    }
    for (tag, tag_rule) in rule.tags() {
        if !tag_rule.kind().accepts_tag(tag) {
            return Err(ItlError::InvalidSchema(format!(
                "field '{name}': <{tag}> cannot be parsed as {}",
                tag_rule.kind()
            )));
        }
        if tag_rule.categories().next().is_none() {
            return Err(ItlError::InvalidSchema(format!(
                "field '{name}': <{tag}> has no compatible categories"
            )));
        }
        if tag_rule.categories().any(|c| c.as_str().trim().is_empty()) {
            return Err(ItlError::InvalidSchema(format!(
                "field '{name}': <{tag}> lists a blank category"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::ValueKind;

    fn name_rule() -> FieldRule {
        FieldRule::new("Name").with_tag(
            "string",
            ValueKind::String,
            [("Album", true), ("Movie", true)],
        )
    }

    fn assert_invalid(rules: Vec<FieldRule>) {
        let err = Schema::new(rules).unwrap_err();
        assert!(matches!(err, ItlError::InvalidSchema(_)), "{err}");
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn test_lookup() {
        let schema = Schema::new([name_rule()]).unwrap();

        assert_eq!(
            schema.lookup("Name", "string").unwrap().kind(),
            ValueKind::String
        );
        assert!(matches!(
            schema.lookup("Artist", "string"),
            Err(ItlError::UnknownField(f)) if f == "Artist"
        ));
        assert!(matches!(
            schema.lookup("Name", "integer"),
            Err(ItlError::InvalidFieldTag { field, tag }) if field == "Name" && tag == "integer"
        ));
    }

    #[test]
    fn test_categories_collects_all() {
        let schema = Schema::new([
            name_rule(),
            FieldRule::new("Director").with_tag("string", ValueKind::String, [("Movie", false)]),
            FieldRule::new("Podcast").with_tag("true", ValueKind::Boolean, [("Podcast", true)]),
        ])
        .unwrap();
        let names: Vec<_> = schema.categories().into_iter().map(Category::as_str).collect();
        assert_eq!(names, ["Album", "Movie", "Podcast"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_rejects_duplicate_field() {
        assert_invalid(vec![name_rule(), name_rule()]);
    }

    #[test]
    fn test_rejects_bad_field_names() {
        assert_invalid(vec![
            FieldRule::new("  ").with_tag("string", ValueKind::String, [("Album", true)])
        ]);
        assert_invalid(vec![
            FieldRule::new(" Name").with_tag("string", ValueKind::String, [("Album", true)])
        ]);
    }

    #[test]
    fn test_rejects_field_without_tags() {
        assert_invalid(vec![FieldRule::new("Name")]);
    }

    #[test]
    fn test_rejects_kind_tag_mismatch() {
        assert_invalid(vec![
            FieldRule::new("Name").with_tag("string", ValueKind::Integer, [("Album", true)])
        ]);
        assert_invalid(vec![
            FieldRule::new("Podcast").with_tag("yes", ValueKind::Boolean, [("Podcast", true)])
        ]);
    }

    #[test]
    fn test_rejects_tag_without_categories() {
        let none: [(&str, bool); 0] = [];
        assert_invalid(vec![FieldRule::new("Name").with_tag("string", ValueKind::String, none)]);
        assert_invalid(vec![
            FieldRule::new("Name").with_tag("string", ValueKind::String, [(" ", true)])
        ]);
    }

    #[test]
    fn test_any_tag_kinds_accept_custom_tags() {
        let schema = Schema::new([
            FieldRule::new("Marker").with_tag("flag", ValueKind::Empty, [("Album", true)])
        ])
        .unwrap();
        assert_eq!(
            schema.lookup("Marker", "flag").unwrap().kind(),
            ValueKind::Empty
        );
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
