//! Shape checks shared by every value constructor.
//!
//! These implement the element-shape contract: attribute-free elements,
//! childless leaves, expected tags, and containers without stray text.

use roxmltree::Node;

use super::Element;
use crate::error::{ItlError, Result};

/// Get the tag name without namespace prefix.
///
/// # Arguments
/// * `node` - XML node
///
/// # Returns
/// Local tag name (e.g., "dict" for both `<dict>` and `<p:dict>`)
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use idi_itl::xml::get_tag_name;
///
/// let doc = Document::parse(r#"<plist><dict/></plist>"#).unwrap();
/// let dict = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(dict), "dict");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check whether text is absent or whitespace-only.
///
/// # Arguments
/// * `text` - Text or tail of an element, if any
///
/// # Returns
/// `true` for `None`, the empty string and whitespace-only strings
#[must_use]
pub fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}

/// Reject elements carrying attributes.
///
/// # Arguments
/// * `element` - Element to check; namespace declarations count as attributes
///
/// # Returns
/// `UnexpectedAttributes` if the element has any attribute
pub fn ensure_no_attributes(element: &Element) -> Result<()> {
    if element.attributes().is_empty() {
        Ok(())
    } else {
        Err(ItlError::UnexpectedAttributes {
            tag: element.tag().to_string(),
        })
    }
}

/// Reject elements that are not attribute-free leaves.
///
/// # Arguments
/// * `element` - Element to check
///
/// # Returns
/// `UnexpectedAttributes` or `UnexpectedChildren`, checked in that order
pub fn ensure_leaf(element: &Element) -> Result<()> {
    ensure_no_attributes(element)?;
    if element.children().is_empty() {
        Ok(())
    } else {
        Err(ItlError::UnexpectedChildren {
            tag: element.tag().to_string(),
        })
    }
}

/// Reject elements whose tag is not `expected`.
///
/// # Arguments
/// * `element` - Element to check
/// * `expected` - Required tag name
///
/// # Returns
/// `UnexpectedTag` naming both tags on mismatch
pub fn ensure_tag(element: &Element, expected: &str) -> Result<()> {
    if element.tag() == expected {
        Ok(())
    } else {
        Err(ItlError::UnexpectedTag {
            expected: expected.to_string(),
            found: element.tag().to_string(),
        })
    }
}

/// Reject containers with non-whitespace text before, between or after
/// their children.
///
/// # Arguments
/// * `element` - Container element to check
///
/// # Returns
/// `StrayText` if its text or any child's tail is not blank
pub fn ensure_no_stray_text(element: &Element) -> Result<()> {
    let clean =
        is_blank(element.text()) && element.children().iter().all(|c| is_blank(c.tail()));
    if clean {
        Ok(())
    } else {
        Err(ItlError::StrayText {
            tag: element.tag().to_string(),
        })
    }
}
