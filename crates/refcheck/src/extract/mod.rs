//! Reference extraction for refcheck.
//!
//! This module scans documents for cross-reference tokens: role markers,
//! anchor declarations, glossary term definitions, and code-block directives.

mod patterns;
mod scanner;

pub use patterns::{MarkupPattern, MarkupPatterns};
pub use scanner::{ScanOutcome, Scanner, ScannerConfig};
