//! Command-line argument definitions and parsing
//!
//! Arguments are parsed with clap and turned into library configuration by the
//! command handlers; nothing in here touches files.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "candidate",
    version,
    about = "Inspect and round-trip YAML documents through the candidate node tree",
    long_about = "candidate decodes YAML documents into an annotated node tree that records \
                  keys, parents and resolved aliases, and can encode that tree back into \
                  YAML. Use it to look at how documents are decoded or to check that \
                  documents survive a decode/encode round trip."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print every decoded node with its path, kind, tag, style and value
    Inspect(InspectArgs),
    /// Decode, encode and re-serialize documents
    Roundtrip(RoundtripArgs),
}

/// Common options for file operations
#[derive(Args, Debug, Clone)]
pub struct CommonFileOptions {
    /// Files or directories to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Follow symbolic links when processing directories
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum depth for directory recursion
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Include hidden files (starting with .)
    #[arg(long)]
    pub include_hidden: bool,

    /// Exclude files matching these patterns
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,
}

/// Options shared by commands that decode documents
#[derive(Args, Debug, Clone)]
pub struct DecodeOptions {
    /// Keep going when an alias names an unknown anchor
    #[arg(long)]
    pub lenient_aliases: bool,

    /// Maximum nesting depth accepted while converting
    #[arg(long, value_name = "DEPTH", default_value_t = 1024)]
    pub depth_limit: usize,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub files: CommonFileOptions,

    #[command(flatten)]
    pub decode: DecodeOptions,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the roundtrip command
#[derive(Args, Debug)]
pub struct RoundtripArgs {
    #[command(flatten)]
    pub files: CommonFileOptions,

    #[command(flatten)]
    pub decode: DecodeOptions,

    /// Write the result to this file instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite each input file with its round-tripped content
    #[arg(short = 'i', long)]
    pub in_place: bool,

    /// Leave aliases unlinked when encoding
    #[arg(long)]
    pub no_relink: bool,
}

/// Output format for inspect results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per node
    Text,
    /// Pretty-printed JSON report
    Json,
}
