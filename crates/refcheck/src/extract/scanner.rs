//! Document scanner for the reference extractor.
//!
//! The scanner walks a document line by line, applying the markup pattern set
//! to produce the document's declared symbols, its outgoing references, and
//! its code example declarations.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::config::RoleConfig;
use crate::document::{normalize_name, CodeBlock, Document, Location, Reference, Symbol, SymbolKind};

use super::patterns::MarkupPatterns;

/// Scanner configuration: how role names map into symbol namespaces.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Role name to namespace mapping.
    pub role_map: HashMap<String, SymbolKind>,

    /// Roles skipped entirely (presentational markup).
    pub ignored_roles: HashSet<String>,
}

impl ScannerConfig {
    /// Build a scanner configuration from the role section of the app config.
    #[must_use]
    pub fn from_roles(roles: &RoleConfig) -> Self {
        let mut role_map = HashMap::new();
        for role in &roles.anchor_roles {
            role_map.insert(role.clone(), SymbolKind::Anchor);
        }
        for role in &roles.term_roles {
            role_map.insert(role.clone(), SymbolKind::Term);
        }
        for role in &roles.doc_roles {
            role_map.insert(role.clone(), SymbolKind::Doc);
        }

        Self {
            role_map,
            ignored_roles: roles.ignored_roles.iter().cloned().collect(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::from_roles(&RoleConfig::default())
    }
}

/// Everything extracted from a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Symbols declared by the document (anchors, glossary terms).
    pub symbols: Vec<Symbol>,

    /// References made by the document.
    pub references: Vec<Reference>,

    /// Code example declarations.
    pub code_blocks: Vec<CodeBlock>,
}

impl ScanOutcome {
    /// Check whether the scan found nothing of interest.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.references.is_empty() && self.code_blocks.is_empty()
    }
}

/// State for an open `.. glossary::` block.
#[derive(Debug)]
struct GlossaryBlock {
    /// Indentation of the directive line itself.
    directive_indent: usize,
    /// Indentation of term entry lines, learned from the first entry.
    entry_indent: Option<usize>,
}

/// The reference extractor.
#[derive(Debug)]
pub struct Scanner {
    patterns: MarkupPatterns,
    config: ScannerConfig,
}

impl Scanner {
    /// Create a scanner with the default role configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    /// Create a scanner with a custom role configuration.
    #[must_use]
    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            patterns: MarkupPatterns::new(),
            config,
        }
    }

    /// Scan a document, producing its symbols, references, and code blocks.
    #[must_use]
    pub fn scan(&self, doc: &Document) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut glossary: Option<GlossaryBlock> = None;

        for (idx, line) in doc.content.lines().enumerate() {
            let lineno = idx + 1;
            let location = Location::new(doc.path.clone(), lineno);

            // Glossary term tracking. Term symbols come from entry lines at the
            // block's entry indentation; the block ends at the first non-blank
            // line back at or left of the directive's own indentation.
            if let Some(block) = &mut glossary {
                let trimmed = line.trim_start();
                if trimmed.is_empty() {
                    // blank lines never close the block
                } else {
                    let indent = line.len() - trimmed.len();
                    if indent <= block.directive_indent {
                        glossary = None;
                    } else if block.entry_indent.is_none() && trimmed.starts_with(':') {
                        // directive option such as :sorted:
                    } else if trimmed.starts_with("..") {
                        // markup (anchors, nested directives), not a term;
                        // the pattern checks below still see the line
                    } else {
                        let entry_indent = *block.entry_indent.get_or_insert(indent);
                        if indent == entry_indent {
                            outcome.symbols.push(Symbol {
                                kind: SymbolKind::Term,
                                name: normalize_name(trimmed),
                                location: location.clone(),
                            });
                        }
                    }
                }
            }

            if let Some(caps) = self.patterns.glossary.captures(line) {
                glossary = Some(GlossaryBlock {
                    directive_indent: caps[1].len(),
                    entry_indent: None,
                });
                continue;
            }

            if let Some(caps) = self.patterns.anchor.captures(line) {
                outcome.symbols.push(Symbol {
                    kind: SymbolKind::Anchor,
                    name: normalize_name(&caps[1]),
                    location: location.clone(),
                });
                continue;
            }

            if let Some(caps) = self.patterns.code_block.captures(line) {
                outcome.code_blocks.push(CodeBlock {
                    language: caps[1].to_string(),
                    location: location.clone(),
                });
                continue;
            }

            for caps in self.patterns.role.captures_iter(line) {
                let role = &caps[1];
                if self.config.ignored_roles.contains(role) {
                    continue;
                }
                let Some(kind) = self.config.role_map.get(role) else {
                    trace!(role = %role, location = %location, "Skipping unmapped role");
                    continue;
                };

                let target = extract_target(&caps[2]);
                let target = match kind {
                    // Doc targets are paths; case is significant
                    SymbolKind::Doc => target.trim().to_string(),
                    SymbolKind::Anchor | SymbolKind::Term => normalize_name(&target),
                };

                outcome.references.push(Reference {
                    kind: *kind,
                    target,
                    location: location.clone(),
                    raw: caps[0].to_string(),
                });
            }
        }

        outcome
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the actual target from role body text.
///
/// Handles the `Title <target>` form and strips the Sphinx `~`/`!` prefixes.
fn extract_target(body: &str) -> String {
    let body = body.trim();
    let inner = if body.ends_with('>') {
        body.rfind('<')
            .map_or(body, |open| &body[open + 1..body.len() - 1])
    } else {
        body
    };
    inner.trim_start_matches(['~', '!']).to_string()
}
