//! Value kinds and the tag-keyed constructor dispatch.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::leaf::{
    parse_base64, parse_boolean, parse_datetime, parse_empty, parse_integer, parse_key,
    parse_non_negative_integer, parse_raw_text, parse_string, parse_timestamp, LeafValue,
};
use crate::error::Result;
use crate::xml::Element;

/// Constructor signature shared by every leaf kind.
pub type ConstructorFn = fn(&Element) -> Result<LeafValue>;

/// Which [`LeafValue`] constructor to run for an element.
///
/// Schemas name kinds per (field, tag) pair; several kinds may read the
/// same tag (`<integer>` backs `Integer`, `NonNegativeInteger` and
/// `Timestamp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Empty,
    Boolean,
    RawText,
    String,
    Base64,
    DateTime,
    Integer,
    NonNegativeInteger,
    Timestamp,
    Key,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 10] = [
        Self::Empty,
        Self::Boolean,
        Self::RawText,
        Self::String,
        Self::Base64,
        Self::DateTime,
        Self::Integer,
        Self::NonNegativeInteger,
        Self::Timestamp,
        Self::Key,
    ];

    /// Name as used in schema configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Boolean => "Boolean",
            Self::RawText => "RawText",
            Self::String => "String",
            Self::Base64 => "Base64",
            Self::DateTime => "DateTime",
            Self::Integer => "Integer",
            Self::NonNegativeInteger => "NonNegativeInteger",
            Self::Timestamp => "Timestamp",
            Self::Key => "Key",
        }
    }

    /// Tags this kind can be constructed from; `None` means any tag.
    #[must_use]
    pub fn tags(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Empty | Self::RawText => None,
            Self::Boolean => Some(&["true", "false"]),
            Self::String => Some(&["string"]),
            Self::Base64 => Some(&["data"]),
            Self::DateTime => Some(&["date"]),
            Self::Integer | Self::NonNegativeInteger | Self::Timestamp => Some(&["integer"]),
            Self::Key => Some(&["key"]),
        }
    }

    /// Check whether an element with `tag` can ever produce this kind.
    #[must_use]
    pub fn accepts_tag(&self, tag: &str) -> bool {
        self.tags().map_or(true, |tags| tags.contains(&tag))
    }

    /// The kind a plist reader would pick for `tag` without a schema.
    ///
    /// # Examples
    /// ```
    /// use idi_itl::value::ValueKind;
    ///
    /// assert_eq!(ValueKind::natural("integer"), Some(ValueKind::Integer));
    /// assert_eq!(ValueKind::natural("false"), Some(ValueKind::Boolean));
    /// assert_eq!(ValueKind::natural("array"), None);
    /// ```
    #[must_use]
    pub fn natural(tag: &str) -> Option<Self> {
        match tag {
            "true" | "false" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "data" => Some(Self::Base64),
            "date" => Some(Self::DateTime),
            "integer" => Some(Self::Integer),
            "key" => Some(Self::Key),
            _ => None,
        }
    }

    /// Constructor for this kind.
    #[must_use]
    pub fn constructor(&self) -> ConstructorFn {
        match self {
            Self::Empty => parse_empty,
            Self::Boolean => parse_boolean,
            Self::RawText => parse_raw_text,
            Self::String => parse_string,
            Self::Base64 => parse_base64,
            Self::DateTime => parse_datetime,
            Self::Integer => parse_integer,
            Self::NonNegativeInteger => parse_non_negative_integer,
            Self::Timestamp => parse_timestamp,
            Self::Key => parse_key,
        }
    }

    /// Run this kind's constructor on `element`.
    pub fn parse(&self, element: &Element) -> Result<LeafValue> {
        (self.constructor())(element)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
