//! End-to-end tests for loading an exported library.
//!
//! Uses a small fixture library with one track of every category, a
//! contradictory record and a playlist section.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

use idi_itl::config::DEFAULT_MAX_DOCUMENT_SIZE;
use idi_itl::library::{load_file, Library, OnError};
use idi_itl::schema::{default_schema, Schema};
use idi_itl::{ErrorKind, ItlError, LeafValue};

/// Path to a fixture file.
fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn schema() -> Schema {
    default_schema().expect("bundled schema is valid")
}

fn load_library() -> Library {
    Library::parse(&load_fixture("library.xml"), &schema(), OnError::Skip)
        .expect("fixture library loads")
}

#[test]
fn test_headers() {
    let library = load_library();

    assert_eq!(library.header("Major Version"), Some(&LeafValue::Integer(1)));
    assert_eq!(
        library.header("Date"),
        Some(&LeafValue::DateTime(
            Utc.with_ymd_and_hms(2020, 6, 14, 18, 22, 5).unwrap()
        ))
    );
    assert_eq!(
        library.header("Show Content Ratings"),
        Some(&LeafValue::Boolean(true))
    );
    assert_eq!(
        library
            .header("Library Persistent ID")
            .and_then(LeafValue::as_str),
        Some("0A1B2C3D4E5F6071")
    );
    assert!(library.header("Tracks").is_none());
    assert!(library.header("Playlists").is_none());
}

#[test]
fn test_track_categories() {
    let library = load_library();

    let categories: Vec<(&str, &str)> = library
        .tracks()
        .iter()
        .map(|t| (t.id(), t.record().category().as_str()))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("101", "Album"),
            ("202", "Movie"),
            ("303", "TV Show"),
            ("404", "Podcast"),
            ("505", "Audiobook"),
        ]
    );

    let counts: BTreeMap<&str, usize> = library
        .category_counts()
        .into_iter()
        .map(|(c, n)| (c.as_str(), n))
        .collect();
    assert_eq!(
        counts,
        BTreeMap::from([
            ("Album", 1),
            ("Audiobook", 1),
            ("Movie", 1),
            ("Podcast", 1),
            ("TV Show", 1),
        ])
    );
}

#[test]
fn test_album_track_values() {
    let library = load_library();
    let record = library.track("101").expect("track 101").record();

    assert_eq!(record["Name"], LeafValue::String("Rock & Roll".to_string()));
    assert_eq!(record["Track ID"], LeafValue::NonNegativeInteger(101));
    assert_eq!(record["Normalization"], LeafValue::Integer(-1200));
    assert_eq!(
        record["Play Date"],
        LeafValue::Timestamp {
            seconds: 3_600_000_000,
            instant: Utc.with_ymd_and_hms(2014, 1, 29, 16, 0, 0).unwrap(),
        }
    );
    // Play Date and Play Date UTC describe the same instant.
    assert_eq!(
        record["Play Date"].as_datetime(),
        record["Play Date UTC"].as_datetime()
    );
    assert_eq!(record.len(), 19);
    assert_eq!(record.scalar("Album").map(|s| s.raw().tag()), Some("string"));
}

#[test]
fn test_release_date_either_tag() {
    let library = load_library();

    let movie = library.track("202").expect("track 202").record();
    assert_eq!(
        movie["Release Date"].as_datetime(),
        Some(Utc.with_ymd_and_hms(1926, 12, 31, 8, 0, 0).unwrap())
    );
    assert_eq!(movie["HD"], LeafValue::Boolean(false));

    let podcast = library.track("404").expect("track 404").record();
    assert_eq!(
        podcast["Release Date"].as_datetime(),
        Some(Utc.with_ymd_and_hms(2010, 11, 29, 6, 13, 20).unwrap())
    );
}

#[test]
fn test_contradictory_track_is_skipped() {
    let library = load_library();

    assert!(library.track("606").is_none());
    assert_eq!(
        library.warnings(),
        ["Track 606: Combination of fields matches no category (after field 'Movie')"]
    );
}

#[test]
fn test_strict_load_fails() {
    let err = Library::parse(&load_fixture("library.xml"), &schema(), OnError::Abort)
        .expect_err("contradictory track aborts the load");

    assert!(matches!(
        err,
        ItlError::NoCompatibleCategory { ref field } if field == "Movie"
    ));
    assert_eq!(err.kind(), ErrorKind::CategoryInference);
}

#[test]
fn test_load_file() {
    let path = fixture_path("library.xml");

    let library = load_file(&path, DEFAULT_MAX_DOCUMENT_SIZE, &schema(), OnError::Skip)
        .expect("fixture library loads");
    assert_eq!(library.tracks().len(), 5);

    let err = load_file(&path, 1024, &schema(), OnError::Skip).expect_err("fixture exceeds 1 KiB");
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn test_record_json() {
    let library = load_library();
    let record = library.track("505").expect("track 505").record();

    let json = serde_json::to_value(record).expect("record serializes");
    assert_eq!(json["category"], "Audiobook");
    assert_eq!(
        json["fields"]["Bookmark"],
        serde_json::json!({ "type": "NonNegativeInteger", "value": 125000 })
    );
    assert_eq!(
        json["fields"]["Audiobook"],
        serde_json::json!({ "type": "Boolean", "value": true })
    );
}
