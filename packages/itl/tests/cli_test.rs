//! Tests for the `idi` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn idi() -> Command {
    Command::cargo_bin("idi").unwrap()
}

#[test]
fn test_inspect_summarizes_library() {
    idi()
        .arg("inspect")
        .arg(fixture_path("library.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Application Version: 12.9.5.5"))
        .stdout(predicate::str::contains("Tracks: 5"))
        .stdout(predicate::str::contains("TV Show: 1"))
        .stdout(predicate::str::contains("Warnings: 1"))
        .stdout(predicate::str::contains("Track 606:"));
}

#[test]
fn test_inspect_strict_fails() {
    idi()
        .arg("inspect")
        .arg(fixture_path("library.xml"))
        .arg("--strict")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Combination of fields matches no category",
        ));
}

#[test]
fn test_inspect_size_limit() {
    idi()
        .arg("inspect")
        .arg(fixture_path("library.xml"))
        .args(["--max-size", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document too large"));
}

#[test]
fn test_inspect_missing_file() {
    idi()
        .args(["inspect", "/nonexistent/Library.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn test_show_text() {
    idi()
        .arg("show")
        .arg(fixture_path("library.xml"))
        .arg("303")
        .assert()
        .success()
        .stdout(predicate::str::contains("Track 303 (TV Show)"))
        .stdout(predicate::str::contains("Series: Example Show"));
}

#[test]
fn test_show_json() {
    let output = idi()
        .arg("show")
        .arg(fixture_path("library.xml"))
        .args(["202", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["category"], "Movie");
    assert_eq!(json["fields"]["Director"]["value"], "Buster Keaton");
}

#[test]
fn test_show_unknown_track() {
    idi()
        .arg("show")
        .arg(fixture_path("library.xml"))
        .arg("606")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Track not found: 606"));
}

#[test]
fn test_check_schema_default() {
    idi()
        .arg("check-schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundled default"))
        .stdout(predicate::str::contains(
            "Categories: Album, Audiobook, Movie, Podcast, TV Show",
        ));
}

#[test]
fn test_check_schema_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(
        &path,
        "fields:\n  Name:\n    types: { string: String }\n    categories: { Song: true }\n",
    )
    .unwrap();

    idi()
        .arg("check-schema")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Fields: 1"))
        .stdout(predicate::str::contains("Name: string -> String"));
}

#[test]
fn test_check_schema_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.yaml");
    fs::write(&path, "fields:\n  Name:\n    types: { string: Integer }\n    categories: { Song: true }\n")
        .unwrap();

    idi()
        .arg("check-schema")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schema"));
}

#[test]
fn test_show_with_custom_schema() {
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("Library.xml");
    fs::write(
        &library,
        r#"<plist version="1.0"><dict>
            <key>Tracks</key>
            <dict>
                <key>1</key>
                <dict><key>Name</key><string>Only</string></dict>
            </dict>
        </dict></plist>"#,
    )
    .unwrap();
    let schema = dir.path().join("schema.yaml");
    fs::write(
        &schema,
        "fields:\n  Name:\n    types: { string: String }\n    categories: { Song: true }\n",
    )
    .unwrap();

    idi()
        .arg("show")
        .arg(&library)
        .arg("1")
        .arg("--schema")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("Track 1 (Song)"))
        .stdout(predicate::str::contains("Name: Only"));
}
