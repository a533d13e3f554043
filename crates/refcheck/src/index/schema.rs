//! `SQLite` schema definitions for the refcheck index.
//!
//! This module contains the SQL statements for creating and managing
//! the index schema.

/// SQL statement to create the documents table.
pub const CREATE_DOCUMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE,
    content_hash TEXT NOT NULL,
    scanned_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the symbols table.
pub const CREATE_SYMBOLS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS symbols (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    name TEXT NOT NULL,
    line INTEGER NOT NULL
)
";

/// SQL statement to create the refs table.
pub const CREATE_REFS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS refs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    target TEXT NOT NULL,
    line INTEGER NOT NULL,
    raw TEXT NOT NULL
)
";

/// SQL statement to create an index on `content_hash` for change detection.
pub const CREATE_HASH_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash)
";

/// SQL statement to create an index on symbol names for lookups.
pub const CREATE_SYMBOL_NAME_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_symbols_name ON symbols(name)
";

/// SQL statement to create an index on symbol kinds for filtering.
pub const CREATE_SYMBOL_KIND_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_symbols_kind ON symbols(kind)
";

/// SQL statement to create an index on reference targets for searches.
pub const CREATE_REF_TARGET_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_refs_target ON refs(target)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DOCUMENTS_TABLE,
    CREATE_SYMBOLS_TABLE,
    CREATE_REFS_TABLE,
    CREATE_HASH_INDEX,
    CREATE_SYMBOL_NAME_INDEX,
    CREATE_SYMBOL_KIND_INDEX,
    CREATE_REF_TARGET_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_documents_table_contains_required_columns() {
        assert!(CREATE_DOCUMENTS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("path TEXT NOT NULL UNIQUE"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("content_hash TEXT NOT NULL"));
        assert!(CREATE_DOCUMENTS_TABLE.contains("scanned_at TEXT NOT NULL"));
    }

    #[test]
    fn test_symbol_and_ref_tables_cascade() {
        assert!(CREATE_SYMBOLS_TABLE.contains("ON DELETE CASCADE"));
        assert!(CREATE_REFS_TABLE.contains("ON DELETE CASCADE"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
