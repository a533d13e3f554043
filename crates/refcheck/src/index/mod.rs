//! Persistent index for refcheck.
//!
//! This module provides a `SQLite`-backed, content-addressed index of scanned
//! documents, their declared symbols, and their outgoing references. Documents
//! are keyed by path and change-detected by BLAKE3 content hash, so unchanged
//! files are skipped on re-scan.

pub mod migrations;
pub mod schema;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::document::{Document, Location, Reference, Symbol, SymbolKind};
use crate::error::{Error, Result};
use crate::extract::ScanOutcome;

/// Result of upserting a document into the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document was new to the index.
    Inserted,
    /// The document existed but its content changed; rows were replaced.
    Updated,
    /// The document's content hash matched; nothing was written.
    Unchanged,
}

impl UpsertOutcome {
    /// Check if the upsert wrote anything.
    #[must_use]
    pub fn wrote(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Content-addressed index of scanned documents.
#[derive(Debug)]
pub struct Index {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Index {
    /// Open or create an index database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening index at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL for concurrent readers; cascading deletes need foreign keys on
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Index opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory index for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upsert a document and its scan outcome.
    ///
    /// If the stored content hash matches the document's, nothing is written.
    /// Otherwise the document row is inserted or updated and its symbols and
    /// references are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn upsert(&mut self, doc: &Document, outcome: &ScanOutcome) -> Result<UpsertOutcome> {
        let existing: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT id, content_hash FROM documents WHERE path = ?1",
                [&doc.path],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((_, hash)) = &existing {
            if doc.matches_hash(hash) {
                debug!(path = %doc.path, "Document unchanged, skipping");
                return Ok(UpsertOutcome::Unchanged);
            }
        }

        let tx = self.conn.transaction()?;
        let scanned_at = doc.scanned_at.to_rfc3339();

        let (document_id, result) = match existing {
            Some((id, _)) => {
                tx.execute(
                    "UPDATE documents SET content_hash = ?1, scanned_at = ?2 WHERE id = ?3",
                    params![doc.content_hash, scanned_at, id],
                )?;
                tx.execute("DELETE FROM symbols WHERE document_id = ?1", [id])?;
                tx.execute("DELETE FROM refs WHERE document_id = ?1", [id])?;
                (id, UpsertOutcome::Updated)
            }
            None => {
                tx.execute(
                    "INSERT INTO documents (path, content_hash, scanned_at) VALUES (?1, ?2, ?3)",
                    params![doc.path, doc.content_hash, scanned_at],
                )?;
                (tx.last_insert_rowid(), UpsertOutcome::Inserted)
            }
        };

        for symbol in &outcome.symbols {
            tx.execute(
                "INSERT INTO symbols (document_id, kind, name, line) VALUES (?1, ?2, ?3, ?4)",
                params![
                    document_id,
                    symbol.kind.to_string(),
                    symbol.name,
                    i64::try_from(symbol.location.line).unwrap_or(i64::MAX),
                ],
            )?;
        }
        // every document defines its own name in the doc namespace
        tx.execute(
            "INSERT INTO symbols (document_id, kind, name, line) VALUES (?1, 'doc', ?2, 1)",
            params![document_id, doc.doc_name()],
        )?;
        for reference in &outcome.references {
            tx.execute(
                "INSERT INTO refs (document_id, kind, target, line, raw) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    document_id,
                    reference.kind.to_string(),
                    reference.target,
                    i64::try_from(reference.location.line).unwrap_or(i64::MAX),
                    reference.raw,
                ],
            )?;
        }

        tx.commit()?;
        debug!(path = %doc.path, ?result, "Document indexed");
        Ok(result)
    }

    /// Remove documents whose paths are no longer in the corpus.
    ///
    /// Returns the number of documents removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn prune_missing(&self, keep: &HashSet<String>) -> Result<usize> {
        let stored: Vec<(i64, String)> = self
            .conn
            .prepare("SELECT id, path FROM documents")?
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut removed = 0;
        for (id, path) in stored {
            if !keep.contains(&path) {
                self.conn
                    .execute("DELETE FROM documents WHERE id = ?1", [id])?;
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Pruned {} documents no longer in the corpus", removed);
        }
        Ok(removed)
    }

    /// Count indexed documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn document_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count indexed symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn symbol_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM symbols", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count indexed references.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn reference_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM refs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List indexed symbols, optionally filtered by kind, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn symbols(&self, kind: Option<SymbolKind>, limit: usize) -> Result<Vec<Symbol>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut collected = Vec::new();

        if let Some(kind) = kind {
            let mut stmt = self.conn.prepare(
                r"
                SELECT s.kind, s.name, d.path, s.line
                FROM symbols s JOIN documents d ON d.id = s.document_id
                WHERE s.kind = ?1 ORDER BY s.name, d.path LIMIT ?2
                ",
            )?;
            let rows = stmt.query_map(params![kind.to_string(), limit_i64], Self::row_to_symbol)?;
            for row in rows {
                collected.push(row?);
            }
        } else {
            let mut stmt = self.conn.prepare(
                r"
                SELECT s.kind, s.name, d.path, s.line
                FROM symbols s JOIN documents d ON d.id = s.document_id
                ORDER BY s.name, d.path LIMIT ?1
                ",
            )?;
            let rows = stmt.query_map([limit_i64], Self::row_to_symbol)?;
            for row in rows {
                collected.push(row?);
            }
        }

        Ok(collected)
    }

    /// Find references whose target contains the query (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_references(&self, query: &str, limit: usize) -> Result<Vec<Reference>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let mut stmt = self.conn.prepare(
            r"
            SELECT r.kind, r.target, d.path, r.line, r.raw
            FROM refs r JOIN documents d ON d.id = r.document_id
            WHERE lower(r.target) LIKE ?1
            ORDER BY d.path, r.line LIMIT ?2
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let references = stmt
            .query_map(params![pattern, limit_i64], Self::row_to_reference)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(references)
    }

    /// Get index statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<IndexStats> {
        let documents = self.document_count()?;
        let symbols = self.symbol_count()?;
        let references = self.reference_count()?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT scanned_at FROM documents ORDER BY scanned_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        let last_scanned = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(IndexStats {
            documents,
            symbols,
            references,
            last_scanned,
            db_size_bytes,
        })
    }

    /// Remove everything from the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM documents", [])?;
        info!("Index cleared");
        Ok(())
    }

    /// Convert a symbol row (kind, name, path, line) to a `Symbol`.
    fn row_to_symbol(row: &rusqlite::Row) -> rusqlite::Result<Symbol> {
        let kind_str: String = row.get(0)?;
        let name: String = row.get(1)?;
        let path: String = row.get(2)?;
        let line: i64 = row.get(3)?;

        Ok(Symbol {
            kind: parse_kind(&kind_str),
            name,
            location: Location::new(path, usize::try_from(line).unwrap_or(0)),
        })
    }

    /// Convert a ref row (kind, target, path, line, raw) to a `Reference`.
    fn row_to_reference(row: &rusqlite::Row) -> rusqlite::Result<Reference> {
        let kind_str: String = row.get(0)?;
        let target: String = row.get(1)?;
        let path: String = row.get(2)?;
        let line: i64 = row.get(3)?;
        let raw: String = row.get(4)?;

        Ok(Reference {
            kind: parse_kind(&kind_str),
            target,
            location: Location::new(path, usize::try_from(line).unwrap_or(0)),
            raw,
        })
    }
}

/// Parse a stored kind string, defaulting to `Anchor` for unknown values.
fn parse_kind(kind: &str) -> SymbolKind {
    match kind {
        "anchor" => SymbolKind::Anchor,
        "term" => SymbolKind::Term,
        "doc" => SymbolKind::Doc,
        other => {
            warn!("Unknown symbol kind: {}, defaulting to anchor", other);
            SymbolKind::Anchor
        }
    }
}

/// Statistics about the index.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexStats {
    /// Total number of indexed documents.
    pub documents: i64,
    /// Total number of indexed symbols.
    pub symbols: i64,
    /// Total number of indexed references.
    pub references: i64,
    /// Timestamp of the most recent scan.
    pub last_scanned: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Scanner;

    fn create_test_index() -> Index {
        Index::open_in_memory().expect("failed to create test index")
    }

    fn scanned(path: &str, content: &str) -> (Document, ScanOutcome) {
        let doc = Document::new(path, content.to_string());
        let outcome = Scanner::new().scan(&doc);
        (doc, outcome)
    }

    #[test]
    fn test_open_in_memory() {
        let index = Index::open_in_memory();
        assert!(index.is_ok());
    }

    #[test]
    fn test_upsert_insert() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("crud.rst", ".. _crud:\n\nSee :ref:`crud`.\n");

        let result = index.upsert(&doc, &outcome).unwrap();
        assert_eq!(result, UpsertOutcome::Inserted);
        assert!(result.wrote());

        assert_eq!(index.document_count().unwrap(), 1);
        // the anchor plus the document's own doc-name symbol
        assert_eq!(index.symbol_count().unwrap(), 2);
        assert_eq!(index.reference_count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_unchanged() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", ".. _a:\n");

        assert_eq!(index.upsert(&doc, &outcome).unwrap(), UpsertOutcome::Inserted);
        let again = index.upsert(&doc, &outcome).unwrap();
        assert_eq!(again, UpsertOutcome::Unchanged);
        assert!(!again.wrote());
    }

    #[test]
    fn test_upsert_updated_replaces_rows() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", ".. _one:\n.. _two:\n");
        index.upsert(&doc, &outcome).unwrap();
        assert_eq!(index.symbol_count().unwrap(), 3);

        let (doc2, outcome2) = scanned("a.rst", ".. _only:\n");
        let result = index.upsert(&doc2, &outcome2).unwrap();
        assert_eq!(result, UpsertOutcome::Updated);

        assert_eq!(index.document_count().unwrap(), 1);
        assert_eq!(index.symbol_count().unwrap(), 2);
    }

    #[test]
    fn test_prune_missing() {
        let mut index = create_test_index();
        let (a, oa) = scanned("a.rst", ".. _a:\n");
        let (b, ob) = scanned("b.rst", ".. _b:\n");
        index.upsert(&a, &oa).unwrap();
        index.upsert(&b, &ob).unwrap();

        let keep: HashSet<String> = ["a.rst".to_string()].into_iter().collect();
        let removed = index.prune_missing(&keep).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(index.document_count().unwrap(), 1);
        // cascade removed b's symbols
        assert_eq!(index.symbol_count().unwrap(), 2);
    }

    #[test]
    fn test_symbols_listing() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned(
            "glossary.rst",
            ".. _anchors-first:\n\n.. glossary::\n\n   bson\n      Binary JSON.\n",
        );
        index.upsert(&doc, &outcome).unwrap();

        let all = index.symbols(None, 10).unwrap();
        assert_eq!(all.len(), 3);

        let terms = index.symbols(Some(SymbolKind::Term), 10).unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].name, "bson");
        assert_eq!(terms[0].location.path, "glossary.rst");
    }

    #[test]
    fn test_symbols_doc_kind() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("reference/insert.rst", "Insert\n======\n");
        index.upsert(&doc, &outcome).unwrap();

        let docs = index.symbols(Some(SymbolKind::Doc), 10).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "/reference/insert");
        assert_eq!(docs[0].location.path, "reference/insert.rst");
    }

    #[test]
    fn test_symbols_limit() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", ".. _one:\n.. _two:\n.. _three:\n");
        index.upsert(&doc, &outcome).unwrap();

        let limited = index.symbols(None, 2).unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_find_references() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned(
            "faq.rst",
            "See :ref:`write-concern` and :term:`document`.\n",
        );
        index.upsert(&doc, &outcome).unwrap();

        let hits = index.find_references("write", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, "write-concern");
        assert_eq!(hits[0].location.line, 1);

        let none = index.find_references("nonexistent", 10).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_references_case_insensitive() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", "See :ref:`write-concern`.\n");
        index.upsert(&doc, &outcome).unwrap();

        let hits = index.find_references("WRITE", 10).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_stats_empty() {
        let index = create_test_index();
        let stats = index.stats().unwrap();

        assert_eq!(stats.documents, 0);
        assert_eq!(stats.symbols, 0);
        assert_eq!(stats.references, 0);
        assert!(stats.last_scanned.is_none());
    }

    #[test]
    fn test_stats_with_data() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", ".. _a:\n\nSee :ref:`a`.\n");
        index.upsert(&doc, &outcome).unwrap();

        let stats = index.stats().unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.symbols, 2);
        assert_eq!(stats.references, 1);
        assert!(stats.last_scanned.is_some());
    }

    #[test]
    fn test_clear() {
        let mut index = create_test_index();
        let (doc, outcome) = scanned("a.rst", ".. _a:\n");
        index.upsert(&doc, &outcome).unwrap();
        assert_eq!(index.document_count().unwrap(), 1);

        index.clear().unwrap();
        assert_eq!(index.document_count().unwrap(), 0);
        assert_eq!(index.symbol_count().unwrap(), 0);
    }

    #[test]
    fn test_path() {
        let index = create_test_index();
        assert_eq!(index.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("refcheck_test_{}.db", std::process::id()));

        let mut index = Index::open(&db_path).unwrap();
        let (doc, outcome) = scanned("a.rst", ".. _a:\n");
        index.upsert(&doc, &outcome).unwrap();
        assert_eq!(index.document_count().unwrap(), 1);
        assert_eq!(index.path(), db_path);

        drop(index);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir.join(format!(
            "refcheck_test_{}/nested/index.db",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let index = Index::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(index);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }

    #[test]
    fn test_parse_kind_roundtrip() {
        assert_eq!(parse_kind("anchor"), SymbolKind::Anchor);
        assert_eq!(parse_kind("term"), SymbolKind::Term);
        assert_eq!(parse_kind("doc"), SymbolKind::Doc);
        assert_eq!(parse_kind("bogus"), SymbolKind::Anchor);
    }

    #[test]
    fn test_index_stats_serialize() {
        let stats = IndexStats {
            documents: 3,
            symbols: 10,
            references: 20,
            last_scanned: None,
            db_size_bytes: 1024,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"documents\":3"));
    }
}
