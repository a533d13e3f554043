//! Command-line interface for refcheck.
//!
//! This module provides the CLI structure and command handlers for the
//! `refchk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, IndexCommand, OutputFormat, RefsCommand, StatsCommand,
    SymbolKindArg, SymbolsCommand,
};

/// refchk - Validate cross-references in a documentation corpus
///
/// Scans reStructuredText documentation trees, extracts anchors, glossary
/// terms, and document names, and reports dangling or ambiguous references.
#[derive(Debug, Parser)]
#[command(name = "refchk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a documentation tree for broken references
    Check(CheckCommand),

    /// List symbols defined in the corpus
    Symbols(SymbolsCommand),

    /// Find references by target
    Refs(RefsCommand),

    /// Manage the persistent index
    #[command(subcommand)]
    Index(IndexCommand),

    /// Show index statistics
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
