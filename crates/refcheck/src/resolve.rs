//! Reference resolution for refcheck.
//!
//! The resolver validates every extracted reference against the symbol table:
//! each reference must resolve to exactly one symbol. Dangling and ambiguous
//! references, duplicate definitions, missing documents, and unknown
//! code-block languages become diagnostics.

use serde::Serialize;
use tracing::debug;

use crate::document::{Document, Location, Symbol, SymbolKind};
use crate::extract::ScanOutcome;
use crate::report::{Diagnostic, Severity};
use crate::symbols::SymbolTable;

/// A document paired with its extraction outcome.
#[derive(Debug, Clone)]
pub struct ScannedDocument {
    /// The scanned document.
    pub document: Document,
    /// What the extractor found in it.
    pub outcome: ScanOutcome,
}

/// The outcome of resolving a corpus.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// All findings, unordered.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of documents scanned.
    pub documents: usize,
    /// Number of distinct symbols in the table.
    pub symbols: usize,
    /// Number of references checked.
    pub references: usize,
}

impl Resolution {
    /// Count of error-severity diagnostics.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Count of warning-severity diagnostics.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Overall verdict.
    #[must_use]
    pub fn passed(&self, fail_on_warnings: bool) -> bool {
        self.errors() == 0 && (!fail_on_warnings || self.warnings() == 0)
    }
}

/// The resolver.
#[derive(Debug)]
pub struct Resolver {
    accepted_languages: Vec<String>,
}

impl Resolver {
    /// Create a resolver that accepts the given code-block languages.
    #[must_use]
    pub fn new(accepted_languages: Vec<String>) -> Self {
        Self { accepted_languages }
    }

    /// Build the symbol table for a scanned corpus.
    ///
    /// Anchors and terms come from the extraction outcomes; every document
    /// also contributes its extension-stripped path to the `Doc` namespace.
    #[must_use]
    pub fn build_symbol_table(scanned: &[ScannedDocument]) -> SymbolTable {
        let mut table = SymbolTable::new();
        for sd in scanned {
            for symbol in &sd.outcome.symbols {
                table.insert(symbol.clone());
            }
            table.insert(Symbol {
                kind: SymbolKind::Doc,
                name: sd.document.doc_name(),
                location: Location::new(sd.document.path.clone(), 1),
            });
        }
        table
    }

    /// Resolve a scanned corpus, producing diagnostics and counts.
    #[must_use]
    pub fn resolve(&self, scanned: &[ScannedDocument]) -> Resolution {
        let table = Self::build_symbol_table(scanned);
        let mut diagnostics = Vec::new();

        // Duplicate definitions: terms must be defined exactly once; extra
        // anchor declarations only warn because the renderer picks one.
        for (name, locations) in table.duplicates_of(SymbolKind::Term) {
            for location in &locations[1..] {
                diagnostics.push(Diagnostic::error(
                    "TERM_REDEFINED",
                    format!(
                        "glossary term '{name}' is already defined at {}",
                        locations[0]
                    ),
                    location.clone(),
                ));
            }
        }
        for (name, locations) in table.duplicates_of(SymbolKind::Anchor) {
            for location in &locations[1..] {
                diagnostics.push(Diagnostic::warning(
                    "ANCHOR_DUPLICATE",
                    format!("anchor '{name}' is already declared at {}", locations[0]),
                    location.clone(),
                ));
            }
        }

        let mut references = 0;
        for sd in scanned {
            for reference in &sd.outcome.references {
                references += 1;
                match reference.kind {
                    SymbolKind::Doc => {
                        let target =
                            resolve_doc_target(&reference.target, &sd.document.path);
                        if !table.contains(SymbolKind::Doc, &target) {
                            diagnostics.push(Diagnostic::error(
                                "DOC_MISSING",
                                format!("no document named '{target}' in the corpus"),
                                reference.location.clone(),
                            ));
                        }
                    }
                    kind @ (SymbolKind::Anchor | SymbolKind::Term) => {
                        let defs = table.definitions_of(kind, &reference.target);
                        match defs.len() {
                            0 => diagnostics.push(Diagnostic::error(
                                "REF_DANGLING",
                                format!(
                                    "{kind} '{}' is referenced but never defined",
                                    reference.target
                                ),
                                reference.location.clone(),
                            )),
                            1 => {}
                            n => diagnostics.push(Diagnostic::error(
                                "REF_AMBIGUOUS",
                                format!(
                                    "{kind} '{}' resolves to {n} definitions",
                                    reference.target
                                ),
                                reference.location.clone(),
                            )),
                        }
                    }
                }
            }

            for block in &sd.outcome.code_blocks {
                if block.language.is_empty() {
                    continue;
                }
                if !self
                    .accepted_languages
                    .iter()
                    .any(|l| l.eq_ignore_ascii_case(&block.language))
                {
                    diagnostics.push(Diagnostic::warning(
                        "CODE_LANG_UNKNOWN",
                        format!("code-block language '{}' is not recognized", block.language),
                        block.location.clone(),
                    ));
                }
            }
        }

        debug!(
            documents = scanned.len(),
            symbols = table.len(),
            references,
            findings = diagnostics.len(),
            "Resolution complete"
        );

        Resolution {
            diagnostics,
            documents: scanned.len(),
            symbols: table.len(),
            references,
        }
    }
}

/// Resolve a `:doc:` target to a corpus-absolute document name.
///
/// Targets starting with `/` are corpus-absolute; others are relative to the
/// referencing document's directory. `.` and `..` segments are collapsed.
#[must_use]
pub fn resolve_doc_target(target: &str, from_path: &str) -> String {
    let joined = if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        let dir = from_path.rsplit_once('/').map_or("", |(d, _)| d);
        if dir.is_empty() {
            target.to_string()
        } else {
            format!("{dir}/{target}")
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Scanner;

    fn scan_corpus(files: &[(&str, &str)]) -> Vec<ScannedDocument> {
        let scanner = Scanner::new();
        files
            .iter()
            .map(|(path, content)| {
                let document = Document::new(*path, (*content).to_string());
                let outcome = scanner.scan(&document);
                ScannedDocument { document, outcome }
            })
            .collect()
    }

    fn resolve(files: &[(&str, &str)]) -> Resolution {
        Resolver::new(vec!["javascript".to_string(), "sh".to_string()])
            .resolve(&scan_corpus(files))
    }

    #[test]
    fn test_clean_corpus_passes() {
        let resolution = resolve(&[
            (
                "crud.rst",
                ".. _crud-intro:\n\nCRUD\n====\n\nSee :ref:`crud-intro`.\n",
            ),
            (
                "glossary.rst",
                ".. glossary::\n\n   document\n      A stored record.\n",
            ),
            ("faq.rst", "A :term:`document` is the unit of data.\n"),
        ]);

        assert!(resolution.diagnostics.is_empty());
        assert!(resolution.passed(true));
        assert_eq!(resolution.documents, 3);
    }

    #[test]
    fn test_dangling_ref() {
        let resolution = resolve(&[("a.rst", "See :ref:`no-such-anchor`.\n")]);

        assert_eq!(resolution.errors(), 1);
        let d = &resolution.diagnostics[0];
        assert_eq!(d.code, "REF_DANGLING");
        assert!(d.message.contains("no-such-anchor"));
        assert!(!resolution.passed(false));
    }

    #[test]
    fn test_dangling_term() {
        let resolution = resolve(&[("a.rst", "A :term:`replica set` has members.\n")]);

        assert_eq!(resolution.errors(), 1);
        assert_eq!(resolution.diagnostics[0].code, "REF_DANGLING");
        assert!(resolution.diagnostics[0].message.contains("term"));
    }

    #[test]
    fn test_ambiguous_anchor_reference() {
        let resolution = resolve(&[
            ("a.rst", ".. _setup:\n"),
            ("b.rst", ".. _setup:\n"),
            ("c.rst", "See :ref:`setup`.\n"),
        ]);

        let codes: Vec<_> = resolution.diagnostics.iter().map(|d| d.code).collect();
        assert!(codes.contains(&"REF_AMBIGUOUS"));
        assert!(codes.contains(&"ANCHOR_DUPLICATE"));
    }

    #[test]
    fn test_term_redefined_is_error() {
        let resolution = resolve(&[
            (
                "glossary.rst",
                ".. glossary::\n\n   bson\n      Binary JSON.\n",
            ),
            (
                "intro.rst",
                ".. glossary::\n\n   bson\n      Defined again.\n",
            ),
        ]);

        assert_eq!(resolution.errors(), 1);
        let d = &resolution.diagnostics[0];
        assert_eq!(d.code, "TERM_REDEFINED");
        assert!(d.message.contains("bson"));
    }

    #[test]
    fn test_anchor_duplicate_is_warning() {
        let resolution = resolve(&[("a.rst", ".. _dup:\n"), ("b.rst", ".. _dup:\n")]);

        assert_eq!(resolution.errors(), 0);
        assert_eq!(resolution.warnings(), 1);
        assert!(resolution.passed(false));
        assert!(!resolution.passed(true));
    }

    #[test]
    fn test_doc_reference_absolute() {
        let resolution = resolve(&[
            ("index.rst", "Read :doc:`/reference/insert`.\n"),
            ("reference/insert.rst", "Insert\n======\n"),
        ]);

        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_doc_reference_relative() {
        let resolution = resolve(&[
            ("reference/index.rst", "Read :doc:`insert` next.\n"),
            ("reference/insert.rst", "Insert\n======\n"),
        ]);

        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_doc_missing() {
        let resolution = resolve(&[("index.rst", "Read :doc:`/reference/delete`.\n")]);

        assert_eq!(resolution.errors(), 1);
        let d = &resolution.diagnostics[0];
        assert_eq!(d.code, "DOC_MISSING");
        assert!(d.message.contains("/reference/delete"));
    }

    #[test]
    fn test_unknown_code_language_warns() {
        let resolution = resolve(&[("a.rst", ".. code-block:: brainfuck\n")]);

        assert_eq!(resolution.warnings(), 1);
        assert_eq!(resolution.diagnostics[0].code, "CODE_LANG_UNKNOWN");
    }

    #[test]
    fn test_known_code_language_case_insensitive() {
        let resolution = resolve(&[("a.rst", ".. code-block:: JavaScript\n")]);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_code_language_allowed() {
        let resolution = resolve(&[("a.rst", ".. code-block::\n")]);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_reference_counts() {
        let resolution = resolve(&[(
            "a.rst",
            ".. _x:\n\nSee :ref:`x` and :ref:`x` again.\n",
        )]);

        assert_eq!(resolution.references, 2);
        assert_eq!(resolution.documents, 1);
    }

    #[test]
    fn test_build_symbol_table_includes_doc_names() {
        let scanned = scan_corpus(&[("reference/insert.rst", "Insert\n")]);
        let table = Resolver::build_symbol_table(&scanned);

        assert!(table.contains(SymbolKind::Doc, "/reference/insert"));
    }

    #[test]
    fn test_resolve_doc_target_absolute() {
        assert_eq!(
            resolve_doc_target("/reference/insert", "faq.rst"),
            "/reference/insert"
        );
    }

    #[test]
    fn test_resolve_doc_target_relative() {
        assert_eq!(
            resolve_doc_target("insert", "reference/index.rst"),
            "/reference/insert"
        );
    }

    #[test]
    fn test_resolve_doc_target_parent() {
        assert_eq!(
            resolve_doc_target("../tutorial", "reference/index.rst"),
            "/tutorial"
        );
    }

    #[test]
    fn test_resolve_doc_target_from_root() {
        assert_eq!(resolve_doc_target("tutorial", "index.rst"), "/tutorial");
    }

    #[test]
    fn test_resolution_serialize() {
        let resolution = resolve(&[("a.rst", "See :ref:`missing`.\n")]);
        let json = serde_json::to_string(&resolution).unwrap();
        assert!(json.contains("REF_DANGLING"));
        assert!(json.contains("\"documents\":1"));
    }
}
