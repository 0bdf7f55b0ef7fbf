//! Command-line interface for idi.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::DEFAULT_MAX_DOCUMENT_SIZE;
use crate::error::{ItlError, Result};
use crate::library::{load_file, Library, OnError};
use crate::schema::{default_schema, load_schema, Category, Schema};

/// idi - Inspect exported iTunes library XML files.
#[derive(Parser)]
#[command(name = "idi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a library and summarize its contents.
    Inspect {
        /// Path to the exported library XML
        library: PathBuf,

        /// Schema YAML file (default: bundled ITL schema)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Fail on the first track that does not resolve
        #[arg(long)]
        strict: bool,

        /// Refuse documents larger than this many bytes
        #[arg(long, default_value_t = DEFAULT_MAX_DOCUMENT_SIZE)]
        max_size: u64,
    },

    /// Print one resolved track.
    Show {
        /// Path to the exported library XML
        library: PathBuf,

        /// Track id (the key under Tracks)
        track_id: String,

        /// Schema YAML file (default: bundled ITL schema)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Print the track as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a schema file and summarize it.
    CheckSchema {
        /// Schema YAML file (default: bundled ITL schema)
        file: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            library,
            schema,
            strict,
            max_size,
        } => inspect_command(&library, schema.as_deref(), strict, max_size),
        Commands::Show {
            library,
            track_id,
            schema,
            json,
        } => show_command(&library, &track_id, schema.as_deref(), json),
        Commands::CheckSchema { file } => check_schema_command(file.as_deref()),
    }
}

fn resolve_schema(path: Option<&Path>) -> Result<Schema> {
    match path {
        Some(path) => load_schema(path),
        None => default_schema(),
    }
}

/// Load a library behind a spinner.
fn load_with_progress(
    path: &Path,
    schema: &Schema,
    on_error: OnError,
    max_size: u64,
) -> Result<Library> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(format!("Loading {}...", path.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = load_file(path, max_size, schema, on_error);
    pb.finish_and_clear();
    result
}

/// Execute the inspect command.
fn inspect_command(
    path: &Path,
    schema: Option<&Path>,
    strict: bool,
    max_size: u64,
) -> Result<()> {
    let schema = resolve_schema(schema)?;
    let on_error = if strict { OnError::Abort } else { OnError::Skip };

    println!("{} {}", style("Inspecting").bold(), style(path.display()).cyan());
    println!();

    let library = load_with_progress(path, &schema, on_error, max_size)?;

    for (key, value) in library.headers() {
        println!("  {key}: {}", style(value).green());
    }
    println!();
    println!("  Tracks: {}", library.tracks().len());
    for (category, count) in library.category_counts() {
        println!("    {category}: {count}");
    }

    if !library.warnings().is_empty() {
        println!();
        println!(
            "  Warnings: {}",
            style(library.warnings().len()).yellow().bold()
        );
        for warning in library.warnings() {
            println!("    {}", style(warning).yellow());
        }
    }

    Ok(())
}

/// Execute the show command.
fn show_command(path: &Path, track_id: &str, schema: Option<&Path>, json: bool) -> Result<()> {
    let schema = resolve_schema(schema)?;
    let library = load_file(path, DEFAULT_MAX_DOCUMENT_SIZE, &schema, OnError::Skip)?;

    let track = library
        .track(track_id)
        .ok_or_else(|| ItlError::TrackNotFound(track_id.to_string()))?;
    let record = track.record();

    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    println!(
        "{} {} ({})",
        style("Track").bold(),
        style(track.id()).cyan(),
        style(record.category()).green()
    );
    for (name, value) in record.fields() {
        println!("  {name}: {value}");
    }

    Ok(())
}

/// Execute the check-schema command.
fn check_schema_command(file: Option<&Path>) -> Result<()> {
    let schema = resolve_schema(file)?;

    match file {
        Some(path) => println!("{} {}", style("Valid schema:").green().bold(), path.display()),
        None => println!("{} (bundled default)", style("Valid schema").green().bold()),
    }
    println!("  Fields: {}", schema.len());

    let categories: Vec<_> = schema.categories().into_iter().map(Category::as_str).collect();
    println!("  Categories: {}", categories.join(", "));
    println!();

    for field in schema.fields() {
        let tags: Vec<_> = field
            .tags()
            .map(|(tag, rule)| format!("{tag} -> {}", rule.kind()))
            .collect();
        println!("  {}: {}", style(field.name()).cyan(), tags.join(", "));
    }

    Ok(())
}
