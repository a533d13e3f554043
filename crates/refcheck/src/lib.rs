//! `refcheck` - Cross-reference validation for documentation corpora
//!
//! This library provides the core functionality for scanning reStructuredText
//! documentation trees, extracting anchors, glossary terms, and document names,
//! and resolving every cross-reference against them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod corpus;
pub mod document;
pub mod error;
pub mod extract;
pub mod index;
pub mod logging;
pub mod report;
pub mod resolve;
pub mod symbols;

pub use config::Config;
pub use corpus::CorpusWalker;
pub use document::{Document, Location, Reference, Symbol, SymbolKind};
pub use error::{Error, Result};
pub use extract::{ScanOutcome, Scanner, ScannerConfig};
pub use index::{Index, IndexStats};
pub use logging::init_logging;
pub use resolve::{Resolution, Resolver, ScannedDocument};
pub use symbols::SymbolTable;
