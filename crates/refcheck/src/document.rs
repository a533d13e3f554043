//! Core corpus types for refcheck.
//!
//! This module defines the fundamental data structures for representing
//! scanned documents and the reference markers found within them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The namespace a symbol or reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// A named anchor declared with `.. _label:` and referenced via `:ref:`.
    Anchor,
    /// A glossary term defined under `.. glossary::` and referenced via `:term:`.
    Term,
    /// A document path referenced via `:doc:`.
    Doc,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anchor => write!(f, "anchor"),
            Self::Term => write!(f, "term"),
            Self::Doc => write!(f, "doc"),
        }
    }
}

/// A position within the corpus: document path plus 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Corpus-relative document path (forward slashes).
    pub path: String,
    /// 1-based line number.
    pub line: usize,
}

impl Location {
    /// Create a new location.
    #[must_use]
    pub fn new(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// A declared symbol: something a reference can resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// The namespace this symbol lives in.
    pub kind: SymbolKind,
    /// Normalized symbol name.
    pub name: String,
    /// Where the symbol is defined.
    pub location: Location,
}

/// A use of a symbol: a cross-reference token found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The namespace the reference targets.
    pub kind: SymbolKind,
    /// Normalized target name.
    pub target: String,
    /// Where the reference appears.
    pub location: Location,
    /// The raw markup text as written in the source.
    pub raw: String,
}

/// A code example declaration (`.. code-block:: <lang>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// The declared highlighting language (may be empty).
    pub language: String,
    /// Where the directive appears.
    pub location: Location,
}

/// A scanned document from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for this document (assigned by the index).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Corpus-relative path (forward slashes).
    pub path: String,

    /// Full document content.
    pub content: String,

    /// BLAKE3 hash of the content, used as its content address.
    pub content_hash: String,

    /// When this document was scanned.
    pub scanned_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document with the given path and content.
    ///
    /// Automatically computes the content hash and sets the scan timestamp to now.
    #[must_use]
    pub fn new(path: impl Into<String>, content: String) -> Self {
        let content_hash = Self::compute_hash(&content);
        Self {
            id: None,
            path: path.into(),
            content,
            content_hash,
            scanned_at: Utc::now(),
        }
    }

    /// Compute the BLAKE3 hash of the given content.
    #[must_use]
    pub fn compute_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Check if this document's content matches the given hash.
    #[must_use]
    pub fn matches_hash(&self, hash: &str) -> bool {
        self.content_hash == hash
    }

    /// The document path with its file extension stripped, rooted at `/`.
    ///
    /// This is the name `:doc:` references resolve against.
    #[must_use]
    pub fn doc_name(&self) -> String {
        let stem = match self.path.rfind('.') {
            Some(dot) if !self.path[dot..].contains('/') => &self.path[..dot],
            _ => self.path.as_str(),
        };
        format!("/{stem}")
    }

    /// Number of lines in the document.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Check if the document content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Normalize a symbol or reference name for lookup.
///
/// The external renderer treats reference names case-insensitively, so both
/// definitions and uses are lowercased and trimmed before comparison.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
