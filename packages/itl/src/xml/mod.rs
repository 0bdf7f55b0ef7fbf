//! XML element model and shape-checking helpers.
//!
//! The generic XML front end is `roxmltree`; this module snapshots its nodes
//! into owned [`Element`] trees and provides the shape checks used by the
//! value and dictionary parsers.

mod element;
mod utils;

pub use element::Element;
pub use utils::{
    ensure_leaf, ensure_no_attributes, ensure_no_stray_text, ensure_tag, get_tag_name, is_blank,
};
