//! Symbol table for refcheck.
//!
//! Maps declared symbol names to every location that defines them. Duplicate
//! definitions are retained rather than overwritten so the resolver can report
//! them.

use std::collections::HashMap;

use crate::document::{Location, Symbol, SymbolKind};

/// Table of declared symbols, keyed by namespace and normalized name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<(SymbolKind, String), Vec<Location>>,
}

impl SymbolTable {
    /// Create an empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol definition. Duplicates accumulate.
    pub fn insert(&mut self, symbol: Symbol) {
        self.entries
            .entry((symbol.kind, symbol.name))
            .or_default()
            .push(symbol.location);
    }

    /// Get all defining locations for a name in a namespace.
    ///
    /// Returns an empty slice if the name is undefined.
    #[must_use]
    pub fn definitions_of(&self, kind: SymbolKind, name: &str) -> &[Location] {
        self.entries
            .get(&(kind, name.to_string()))
            .map_or(&[], Vec::as_slice)
    }

    /// Check whether a name is defined in a namespace.
    #[must_use]
    pub fn contains(&self, kind: SymbolKind, name: &str) -> bool {
        !self.definitions_of(kind, name).is_empty()
    }

    /// Number of distinct names across all namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct names in one namespace.
    #[must_use]
    pub fn count_of(&self, kind: SymbolKind) -> usize {
        self.entries.keys().filter(|(k, _)| *k == kind).count()
    }

    /// Iterate over all entries: (kind, name, defining locations).
    pub fn iter(&self) -> impl Iterator<Item = (SymbolKind, &str, &[Location])> {
        self.entries
            .iter()
            .map(|((kind, name), locs)| (*kind, name.as_str(), locs.as_slice()))
    }

    /// Iterate over names defined more than once in the given namespace.
    pub fn duplicates_of(
        &self,
        kind: SymbolKind,
    ) -> impl Iterator<Item = (&str, &[Location])> {
        self.entries.iter().filter_map(move |((k, name), locs)| {
            (*k == kind && locs.len() > 1).then_some((name.as_str(), locs.as_slice()))
        })
    }
}
