//! Leaf (childless) plist values and their constructors.
//!
//! Every constructor runs the same front-loaded checks in the same order:
//! element shape (no attributes, no children), then text presence, then tag,
//! then content grammar. The first failure aborts construction.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Serialize, Serializer};

use super::ValueKind;
use crate::config::{DATE_FORMAT, DATE_PATTERN, INTEGER_PATTERN, TIMESTAMP_BASIS_UNIX};
use crate::error::{ItlError, Result};
use crate::xml::{ensure_leaf, ensure_tag, Element};

/// Decoded payload of a leaf element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum LeafValue {
    /// Empty element; the payload is its tag name.
    Empty(String),
    /// `<true/>` or `<false/>`.
    Boolean(bool),
    /// Verbatim text of any leaf element, `None` if it had none.
    RawText(Option<String>),
    /// Decoded `<data>` bytes.
    Base64(#[serde(serialize_with = "serialize_base64")] Vec<u8>),
    /// `<date>` instant.
    DateTime(DateTime<Utc>),
    /// Signed `<integer>`.
    Integer(i64),
    /// `<integer>` that must not be negative.
    NonNegativeInteger(u64),
    /// `<integer>` counting seconds since 1900-01-01T00:00:00Z.
    Timestamp {
        seconds: u64,
        instant: DateTime<Utc>,
    },
    /// Non-empty, trimmed `<key>` name.
    Key(String),
    /// `<string>` text, empty when the element had none.
    String(String),
}

fn serialize_base64<S: Serializer>(
    bytes: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
}

impl LeafValue {
    /// The kind of constructor that produced this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Empty(_) => ValueKind::Empty,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::RawText(_) => ValueKind::RawText,
            Self::Base64(_) => ValueKind::Base64,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Integer(_) => ValueKind::Integer,
            Self::NonNegativeInteger(_) => ValueKind::NonNegativeInteger,
            Self::Timestamp { .. } => ValueKind::Timestamp,
            Self::Key(_) => ValueKind::Key,
            Self::String(_) => ValueKind::String,
        }
    }

    /// Textual payload of `String`, `Key`, `Empty` and present `RawText` values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Key(s) | Self::Empty(s) => Some(s.as_str()),
            Self::RawText(s) => s.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral payload of any integer-backed value.
    ///
    /// For timestamps this is the raw second count.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::NonNegativeInteger(u) | Self::Timestamp { seconds: u, .. } => {
                i64::try_from(*u).ok()
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::NonNegativeInteger(u) | Self::Timestamp { seconds: u, .. } => Some(*u),
            Self::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Instant of `DateTime` and `Timestamp` values.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) | Self::Timestamp { instant: dt, .. } => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Base64(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for LeafValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(tag) => write!(f, "<{tag}/>"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::RawText(Some(s)) | Self::Key(s) | Self::String(s) => f.write_str(s),
            Self::RawText(None) => Ok(()),
            Self::Base64(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATE_FORMAT)),
            Self::Integer(i) => write!(f, "{i}"),
            Self::NonNegativeInteger(u) => write!(f, "{u}"),
            Self::Timestamp { instant, .. } => write!(f, "{}", instant.format(DATE_FORMAT)),
        }
    }
}

/// A parsed leaf value together with the element it came from.
///
/// The element is kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    value: LeafValue,
    raw: Element,
}

impl Scalar {
    /// Parse `element` with the constructor for `kind`.
    ///
    /// # Examples
    /// ```
    /// use idi_itl::value::{LeafValue, Scalar, ValueKind};
    /// use idi_itl::xml::Element;
    ///
    /// let e = Element::parse("<data>SGVsbG8sIHdvcmxkLg==</data>").unwrap();
    /// let scalar = Scalar::parse(ValueKind::Base64, &e).unwrap();
    /// assert_eq!(scalar.value(), &LeafValue::Base64(b"Hello, world.".to_vec()));
    /// ```
    pub fn parse(kind: ValueKind, element: &Element) -> Result<Self> {
        let value = kind.parse(element)?;
        Ok(Self {
            value,
            raw: element.detached(),
        })
    }

    #[must_use]
    pub fn value(&self) -> &LeafValue {
        &self.value
    }

    /// The source element.
    #[must_use]
    pub fn raw(&self) -> &Element {
        &self.raw
    }

    #[must_use]
    pub fn into_value(self) -> LeafValue {
        self.value
    }
}

/// Trimmed, non-blank text of a leaf element.
fn scalar_text(element: &Element) -> Result<&str> {
    ensure_leaf(element)?;
    match element.text().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ItlError::MissingText {
            tag: element.tag().to_string(),
        }),
    }
}

pub(super) fn parse_empty(element: &Element) -> Result<LeafValue> {
    empty_tag(element).map(LeafValue::Empty)
}

fn empty_tag(element: &Element) -> Result<String> {
    ensure_leaf(element)?;
    if element.text().is_some() {
        return Err(ItlError::UnexpectedText {
            tag: element.tag().to_string(),
        });
    }
    Ok(element.tag().to_string())
}

pub(super) fn parse_boolean(element: &Element) -> Result<LeafValue> {
    match empty_tag(element)?.as_str() {
        "true" => Ok(LeafValue::Boolean(true)),
        "false" => Ok(LeafValue::Boolean(false)),
        other => Err(ItlError::UnexpectedTag {
            expected: "true/false".to_string(),
            found: other.to_string(),
        }),
    }
}

pub(super) fn parse_raw_text(element: &Element) -> Result<LeafValue> {
    ensure_leaf(element)?;
    Ok(LeafValue::RawText(element.text().map(str::to_string)))
}

pub(super) fn parse_string(element: &Element) -> Result<LeafValue> {
    ensure_leaf(element)?;
    ensure_tag(element, "string")?;
    Ok(LeafValue::String(
        element.text().unwrap_or_default().to_string(),
    ))
}

pub(super) fn parse_base64(element: &Element) -> Result<LeafValue> {
    let text = scalar_text(element)?;
    ensure_tag(element, "data")?;
    // Property lists wrap long data blocks across lines.
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64_STANDARD
        .decode(compact)
        .map(LeafValue::Base64)
        .map_err(|e| ItlError::content("data", format!("invalid base64 encoding ({e})")))
}

pub(super) fn parse_datetime(element: &Element) -> Result<LeafValue> {
    let text = scalar_text(element)?;
    ensure_tag(element, "date")?;
    if !DATE_PATTERN.is_match(text) {
        return Err(ItlError::content(
            "date",
            format!("'{text}' is not in YYYY-MM-DDTHH:MM:SSZ format"),
        ));
    }
    let naive = NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| ItlError::content("date", format!("'{text}' is not a valid date ({e})")))?;
    // chrono reads second 60 as a leap second; plist dates have none.
    if naive.nanosecond() >= 1_000_000_000 {
        return Err(ItlError::content(
            "date",
            format!("'{text}' is not a valid date (second out of range)"),
        ));
    }
    Ok(LeafValue::DateTime(naive.and_utc()))
}

/// Text of an `<integer>` element that matches the integer grammar.
fn integer_text(element: &Element) -> Result<&str> {
    let text = scalar_text(element)?;
    ensure_tag(element, "integer")?;
    if !INTEGER_PATTERN.is_match(text) {
        return Err(ItlError::content(
            "integer",
            format!("'{text}' is not a decimal integer"),
        ));
    }
    Ok(text)
}

fn out_of_range(text: &str) -> ItlError {
    ItlError::content("integer", format!("'{text}' is out of range"))
}

fn integer(element: &Element) -> Result<i64> {
    let text = integer_text(element)?;
    text.parse::<i64>().map_err(|_| out_of_range(text))
}

fn non_negative_integer(element: &Element) -> Result<u64> {
    let text = integer_text(element)?;
    let digits = match text.strip_prefix('-') {
        // Negative zero is still zero.
        Some(digits) if digits.bytes().all(|b| b == b'0') => return Ok(0),
        Some(_) => {
            return Err(ItlError::content(
                "integer",
                format!("{text} must be a non-negative value"),
            ))
        }
        None => text.strip_prefix('+').unwrap_or(text),
    };
    digits.parse::<u64>().map_err(|_| out_of_range(text))
}

pub(super) fn parse_integer(element: &Element) -> Result<LeafValue> {
    integer(element).map(LeafValue::Integer)
}

pub(super) fn parse_non_negative_integer(element: &Element) -> Result<LeafValue> {
    non_negative_integer(element).map(LeafValue::NonNegativeInteger)
}

pub(super) fn parse_timestamp(element: &Element) -> Result<LeafValue> {
    let seconds = non_negative_integer(element)?;
    let instant = i64::try_from(seconds)
        .ok()
        .and_then(|s| s.checked_add(TIMESTAMP_BASIS_UNIX))
        .and_then(|unix| DateTime::from_timestamp(unix, 0))
        .ok_or_else(|| {
            ItlError::content("integer", format!("timestamp {seconds} is out of range"))
        })?;
    Ok(LeafValue::Timestamp { seconds, instant })
}

pub(super) fn parse_key(element: &Element) -> Result<LeafValue> {
    key_name(element).map(LeafValue::Key)
}

/// Field name held by a `<key>` element.
pub(crate) fn key_name(element: &Element) -> Result<String> {
    let text = scalar_text(element)?;
    ensure_tag(element, "key")?;
    Ok(text.to_string())
}
