//! Error types for refcheck.
//!
//! This module defines all error types used throughout the refcheck crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for refcheck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Index Errors ===
    /// Failed to open or create the index database.
    #[error("failed to open index at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("index query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run index migrations.
    #[error("index migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Corpus Errors ===
    /// The corpus root directory does not exist or is not a directory.
    #[error("corpus root not found: {path}")]
    CorpusRoot {
        /// The path that was given.
        path: PathBuf,
    },

    /// Failed to read a document from the corpus.
    #[error("failed to read document {path}: {source}")]
    DocumentRead {
        /// Path to the document.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for refcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a corpus root error.
    #[must_use]
    pub fn corpus_root(path: impl Into<PathBuf>) -> Self {
        Self::CorpusRoot { path: path.into() }
    }

    /// Check if this error is a configuration problem.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad(_) | Self::ConfigValidation { .. })
    }

    /// Check if this error indicates a missing corpus root.
    #[must_use]
    pub fn is_corpus_root(&self) -> bool {
        matches!(self, Self::CorpusRoot { .. })
    }
}
