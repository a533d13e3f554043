//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::document::SymbolKind;

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Root of the documentation tree (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// Update the index with scan results
    #[arg(long)]
    pub update_index: bool,
}

/// Symbols command arguments.
#[derive(Debug, Args)]
pub struct SymbolsCommand {
    /// Scan this documentation tree instead of reading the index
    pub path: Option<PathBuf>,

    /// Filter by symbol kind
    #[arg(short, long, value_enum)]
    pub kind: Option<SymbolKindArg>,

    /// Maximum number of results
    #[arg(short, long, default_value = "50")]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Refs command arguments.
#[derive(Debug, Args)]
pub struct RefsCommand {
    /// The target to search for (substring, case-insensitive)
    pub target: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "50")]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Index management commands.
#[derive(Debug, Subcommand)]
pub enum IndexCommand {
    /// Scan a documentation tree and update the index
    Update {
        /// Root of the documentation tree (defaults to the current directory)
        path: Option<PathBuf>,

        /// Remove indexed documents no longer present in the tree
        #[arg(long)]
        prune: bool,
    },

    /// Show index status
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Remove everything from the index
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Symbol kind argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolKindArg {
    /// Section anchors
    Anchor,
    /// Glossary terms
    Term,
    /// Document names
    Doc,
}

impl From<SymbolKindArg> for SymbolKind {
    fn from(arg: SymbolKindArg) -> Self {
        match arg {
            SymbolKindArg::Anchor => Self::Anchor,
            SymbolKindArg::Term => Self::Term,
            SymbolKindArg::Doc => Self::Doc,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
