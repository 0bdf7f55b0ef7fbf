//! Error types for ITL parsing.
//!
//! A single `ItlError` enum carries every failure. Each variant belongs to
//! one [`ErrorKind`], so callers can branch on the broad class (wrong element
//! shape, malformed content, schema mismatch, category inference) without
//! matching individual variants.

use thiserror::Error;

use crate::schema::Category;

/// Broad classification of an [`ItlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong element shape: tag, attributes, children, arity, stray text.
    Structural,
    /// Malformed scalar payload.
    Content,
    /// Field or tag not recognized by the schema, or an invalid schema.
    Schema,
    /// Zero or several categories remain compatible with a record.
    CategoryInference,
    /// Reading or decoding the input document or configuration failed.
    Input,
}

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum ItlError {
    /// The node handed in is not an element (text, comment, ...).
    #[error("Expected an XML element, found a {0} node")]
    NotAnElement(String),

    /// Element has a tag other than the one(s) required.
    #[error("Expected <{expected}> element, found <{found}>")]
    UnexpectedTag { expected: String, found: String },

    /// Element carries attributes.
    #[error("Element <{tag}> must not have any attributes")]
    UnexpectedAttributes { tag: String },

    /// Leaf element has child elements.
    #[error("Element <{tag}> must not have any child elements")]
    UnexpectedChildren { tag: String },

    /// Element that must be empty has text content.
    #[error("Element <{tag}> must be empty (no text content, not even whitespace)")]
    UnexpectedText { tag: String },

    /// Dictionary does not consist of key/value pairs.
    #[error("Element <{tag}> must have an even number (at least two) of child elements, found {count}")]
    InvalidArity { tag: String, count: usize },

    /// Non-whitespace text between the children of a container.
    #[error("Element <{tag}> must not have any text content between its child elements")]
    StrayText { tag: String },

    /// The same field name appears twice within one record.
    #[error("Duplicate field '{0}' in <dict>")]
    DuplicateField(String),

    /// A required non-whitespace text content is absent.
    #[error("Element <{tag}> must have some non-whitespace content")]
    MissingText { tag: String },

    /// Text content does not match the grammar of its element.
    #[error("Invalid content in <{tag}>: {reason}")]
    InvalidContent { tag: String, reason: String },

    /// Field name not present in the schema.
    #[error("Unknown field '{0}' (not in schema)")]
    UnknownField(String),

    /// Field exists in the schema but not with this value tag.
    #[error("Field '{field}' has invalid tag <{tag}>")]
    InvalidFieldTag { field: String, tag: String },

    /// Schema configuration is inconsistent.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Fields present in a record contradict each other.
    #[error("Combination of fields matches no category (after field '{field}')")]
    NoCompatibleCategory { field: String },

    /// Fields present in a record do not single out one category.
    #[error("Combination of fields is ambiguous; possible categories are: {}", join_categories(.candidates))]
    AmbiguousCategory { candidates: Vec<Category> },

    /// Input exceeds the configured size limit.
    #[error("Document too large: {size} bytes exceeds limit of {limit} bytes")]
    DocumentTooLarge { size: u64, limit: u64 },

    /// Document structure outside the record core (plist envelope, etc.).
    #[error("Invalid library document: {0}")]
    InvalidDocument(String),

    /// Track id not present in the library.
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// YAML decoding failed.
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON encoding failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ItlError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnElement(_)
            | Self::UnexpectedTag { .. }
            | Self::UnexpectedAttributes { .. }
            | Self::UnexpectedChildren { .. }
            | Self::UnexpectedText { .. }
            | Self::InvalidArity { .. }
            | Self::StrayText { .. }
            | Self::DuplicateField(_) => ErrorKind::Structural,
            Self::MissingText { .. } | Self::InvalidContent { .. } => ErrorKind::Content,
            Self::UnknownField(_) | Self::InvalidFieldTag { .. } | Self::InvalidSchema(_) => {
                ErrorKind::Schema
            }
            Self::NoCompatibleCategory { .. } | Self::AmbiguousCategory { .. } => {
                ErrorKind::CategoryInference
            }
            Self::DocumentTooLarge { .. }
            | Self::InvalidDocument(_)
            | Self::TrackNotFound(_)
            | Self::XmlParse(_)
            | Self::Yaml(_)
            | Self::Json(_)
            | Self::Io(_) => ErrorKind::Input,
        }
    }

    pub(crate) fn content(tag: &str, reason: impl Into<String>) -> Self {
        Self::InvalidContent {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for ITL operations.
pub type Result<T> = std::result::Result<T, ItlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ItlError::UnexpectedTag {
            expected: "data".to_string(),
            found: "string".to_string(),
        };
        assert_eq!(err.to_string(), "Expected <data> element, found <string>");
    }

    #[test]
    fn test_ambiguous_category_lists_candidates() {
        let err = ItlError::AmbiguousCategory {
            candidates: vec![Category::new("Album"), Category::new("Movie")],
        };
        assert_eq!(
            err.to_string(),
            "Combination of fields is ambiguous; possible categories are: Album, Movie"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ItlError::DuplicateField("Name".into()).kind(),
            ErrorKind::Structural
        );
        assert_eq!(ItlError::content("integer", "bad").kind(), ErrorKind::Content);
        assert_eq!(
            ItlError::UnknownField("Foo".into()).kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            ItlError::AmbiguousCategory { candidates: vec![] }.kind(),
            ErrorKind::CategoryInference
        );
        assert_eq!(
            ItlError::DocumentTooLarge { size: 2, limit: 1 }.kind(),
            ErrorKind::Input
        );
    }
}
