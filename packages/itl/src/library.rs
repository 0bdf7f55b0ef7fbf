//! Loading whole library documents.
//!
//! An exported library is a `<plist>` wrapping one top-level `<dict>`. Its
//! scalar entries (versions, library id, music folder) become headers; the
//! `Tracks` entry is a `<dict>` of track-id keys to record `<dict>`s, each of
//! which is resolved against a schema. Other container entries (playlists)
//! are skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::config::TRACKS_KEY;
use crate::dictionary::{dict_pairs, split_pair, DictionaryResolver, ResolvedRecord};
use crate::error::{ItlError, Result};
use crate::schema::{Category, Schema};
use crate::value::{LeafValue, ValueKind};
use crate::xml::{ensure_no_attributes, ensure_no_stray_text, Element};

/// What to do when a track record fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Return the first record error.
    Abort,
    /// Log the error, keep a warning and continue with the next record.
    #[default]
    Skip,
}

/// One resolved track record and its id within the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    id: String,
    record: ResolvedRecord,
}

impl Track {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn record(&self) -> &ResolvedRecord {
        &self.record
    }
}

/// Parsed library document.
#[derive(Debug, Clone, Default)]
pub struct Library {
    headers: BTreeMap<String, LeafValue>,
    tracks: Vec<Track>,
    warnings: Vec<String>,
}

impl Library {
    /// Parse a library document.
    ///
    /// # Examples
    /// ```
    /// use idi_itl::library::{Library, OnError};
    /// use idi_itl::schema::default_schema;
    ///
    /// let xml = r#"<plist version="1.0"><dict>
    ///     <key>Major Version</key><integer>1</integer>
    ///     <key>Tracks</key>
    ///     <dict>
    ///         <key>1</key>
    ///         <dict>
    ///             <key>Name</key><string>Intro</string>
    ///             <key>Artist</key><string>Band</string>
    ///         </dict>
    ///     </dict>
    /// </dict></plist>"#;
    ///
    /// let schema = default_schema().unwrap();
    /// let library = Library::parse(xml, &schema, OnError::Abort).unwrap();
    /// assert_eq!(library.tracks().len(), 1);
    /// assert_eq!(library.tracks()[0].record().category().as_str(), "Album");
    /// ```
    pub fn parse(xml: &str, schema: &Schema, on_error: OnError) -> Result<Self> {
        let root = Element::parse(xml)?;
        Self::from_element(&root, schema, on_error)
    }

    /// Build a library from an already parsed `<plist>` element.
    pub fn from_element(root: &Element, schema: &Schema, on_error: OnError) -> Result<Self> {
        if root.tag() != "plist" {
            return Err(ItlError::InvalidDocument(format!(
                "expected <plist> root element, found <{}>",
                root.tag()
            )));
        }
        ensure_no_stray_text(root)?;
        let [dict] = root.children() else {
            return Err(ItlError::InvalidDocument(format!(
                "<plist> must contain exactly one element, found {}",
                root.children().len()
            )));
        };

        let mut library = Self::default();
        let mut seen = BTreeSet::new();
        let mut tracks = None;

        for pair in dict_pairs(dict)? {
            let (name, value) = split_pair(pair)?;
            if !seen.insert(name.clone()) {
                return Err(ItlError::DuplicateField(name));
            }
            if name == TRACKS_KEY {
                tracks = Some(value);
                continue;
            }
            match ValueKind::natural(value.tag()) {
                Some(kind) => {
                    library.headers.insert(name, kind.parse(value)?);
                }
                None => {
                    tracing::debug!(key = %name, tag = value.tag(), "Skipping container entry");
                }
            }
        }

        if let Some(tracks) = tracks {
            library.load_tracks(tracks, schema, on_error)?;
        }

        tracing::debug!(
            tracks = library.tracks.len(),
            skipped = library.warnings.len(),
            "Loaded library"
        );
        Ok(library)
    }

    fn load_tracks(&mut self, tracks: &Element, schema: &Schema, on_error: OnError) -> Result<()> {
        // A library without tracks exports an empty <dict>.
        if tracks.tag() == "dict" && tracks.children().is_empty() {
            ensure_no_attributes(tracks)?;
            return ensure_no_stray_text(tracks);
        }

        let resolver = DictionaryResolver::new(schema);
        let mut seen = BTreeSet::new();
        for pair in dict_pairs(tracks)? {
            let (id, value) = split_pair(pair)?;
            if !seen.insert(id.clone()) {
                return Err(ItlError::DuplicateField(id));
            }
            match resolver.resolve(value) {
                Ok(record) => self.tracks.push(Track { id, record }),
                Err(err) if on_error == OnError::Skip => {
                    tracing::warn!(track = %id, error = %err, "Skipping track");
                    self.warnings.push(format!("Track {id}: {err}"));
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Scalar top-level entries by key.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, LeafValue> {
        &self.headers
    }

    #[must_use]
    pub fn header(&self, key: &str) -> Option<&LeafValue> {
        self.headers.get(key)
    }

    /// Resolved tracks in document order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track with the given id, if it resolved.
    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// One message per skipped track.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of resolved tracks per category.
    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<&Category, usize> {
        let mut counts = BTreeMap::new();
        for track in &self.tracks {
            *counts.entry(track.record.category()).or_insert(0) += 1;
        }
        counts
    }
}

/// Read and parse a library file, refusing files larger than `max_size`.
///
/// # Arguments
/// * `path` - Exported library XML file
/// * `max_size` - Largest accepted file size in bytes
/// * `schema` - Schema used to resolve track records
/// * `on_error` - Whether a bad track aborts the load or is skipped
///
/// # Returns
/// The parsed library, or `DocumentTooLarge` before the file is read
pub fn load_file(
    path: &Path,
    max_size: u64,
    schema: &Schema,
    on_error: OnError,
) -> Result<Library> {
    let size = fs::metadata(path)?.len();
    if size > max_size {
        return Err(ItlError::DocumentTooLarge {
            size,
            limit: max_size,
        });
    }
    let xml = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = size, "Read library document");
    Library::parse(&xml, schema, on_error)
}
