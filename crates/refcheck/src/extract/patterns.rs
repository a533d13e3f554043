//! Markup patterns recognized by the reference extractor.
//!
//! This module provides the compiled regex patterns for the reStructuredText
//! conventions the extractor cares about: role references, anchor targets,
//! code-block directives, and glossary directive openings.

use regex::Regex;

/// A compiled markup pattern.
#[derive(Debug)]
pub struct MarkupPattern {
    /// Name of the pattern for identification.
    pub name: &'static str,

    /// Description of what this pattern matches.
    pub description: &'static str,

    /// The compiled regex.
    regex: Regex,
}

impl MarkupPattern {
    /// Create a new markup pattern.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(name: &'static str, description: &'static str, pattern: &str) -> Self {
        Self {
            name,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check if a line matches this pattern.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Iterate over all capture groups in a line.
    pub fn captures_iter<'a>(&'a self, line: &'a str) -> regex::CaptureMatches<'a, 'a> {
        self.regex.captures_iter(line)
    }

    /// Get the first capture match in a line.
    #[must_use]
    pub fn captures<'a>(&self, line: &'a str) -> Option<regex::Captures<'a>> {
        self.regex.captures(line)
    }
}

/// The pattern set used by the scanner.
#[derive(Debug)]
pub struct MarkupPatterns {
    /// Inline role references: `` :role:`target` `` with an optional
    /// `` Title <target> `` form inside the backticks.
    pub role: MarkupPattern,

    /// Anchor target declarations: `.. _label:` (with an optional trailing
    /// link target for indirect hyperlinks).
    pub anchor: MarkupPattern,

    /// Code example directives: `.. code-block:: <lang>` and variants.
    pub code_block: MarkupPattern,

    /// Glossary directive openings: `.. glossary::`.
    pub glossary: MarkupPattern,
}

impl MarkupPatterns {
    /// Build the built-in pattern set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            role: MarkupPattern::new(
                "role_reference",
                "Inline interpreted-text roles such as :ref:`target`",
                r":([A-Za-z][A-Za-z0-9_.+-]*):`([^`\n]+)`",
            ),
            anchor: MarkupPattern::new(
                "anchor_target",
                "Named hyperlink targets such as .. _label:",
                r"^\s*\.\.\s+_([^:\n]+):\s*\S*\s*$",
            ),
            code_block: MarkupPattern::new(
                "code_block",
                "Code example directives such as .. code-block:: sh",
                r"^\s*\.\.\s+(?:code-block|sourcecode|code)::\s*(\S*)\s*$",
            ),
            glossary: MarkupPattern::new(
                "glossary",
                "Glossary directive openings",
                r"^(\s*)\.\.\s+glossary::",
            ),
        }
    }
}

impl Default for MarkupPatterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_pattern_simple() {
        let patterns = MarkupPatterns::new();
        let caps = patterns
            .role
            .captures("See :ref:`write-operations` for details.")
            .unwrap();

        assert_eq!(&caps[1], "ref");
        assert_eq!(&caps[2], "write-operations");
    }

    #[test]
    fn test_role_pattern_with_title() {
        let patterns = MarkupPatterns::new();
        let caps = patterns
            .role
            .captures(":ref:`Write Operations <write-operations>`")
            .unwrap();

        assert_eq!(&caps[1], "ref");
        assert_eq!(&caps[2], "Write Operations <write-operations>");
    }

    #[test]
    fn test_role_pattern_multiple_per_line() {
        let patterns = MarkupPatterns::new();
        let line = ":term:`document` stored in a :term:`collection`";
        let matches: Vec<_> = patterns.role.captures_iter(line).collect();

        assert_eq!(matches.len(), 2);
        assert_eq!(&matches[0][2], "document");
        assert_eq!(&matches[1][2], "collection");
    }

    #[test]
    fn test_role_pattern_custom_role_names() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.role.captures(":dbcommand:`insert`").unwrap();
        assert_eq!(&caps[1], "dbcommand");
    }

    #[test]
    fn test_role_pattern_no_match_plain_literal() {
        let patterns = MarkupPatterns::new();
        assert!(patterns.role.captures("use ``db.insert()`` here").is_none());
    }

    #[test]
    fn test_anchor_pattern() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.anchor.captures(".. _write-operations:").unwrap();
        assert_eq!(&caps[1], "write-operations");
    }

    #[test]
    fn test_anchor_pattern_indented() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.anchor.captures("   .. _capped-collections:").unwrap();
        assert_eq!(&caps[1], "capped-collections");
    }

    #[test]
    fn test_anchor_pattern_indirect_target() {
        let patterns = MarkupPatterns::new();
        let caps = patterns
            .anchor
            .captures(".. _issue-tracker: https://example.org/tracker")
            .unwrap();
        assert_eq!(&caps[1], "issue-tracker");
    }

    #[test]
    fn test_anchor_pattern_rejects_comments() {
        let patterns = MarkupPatterns::new();
        assert!(patterns.anchor.captures(".. just a comment").is_none());
        assert!(patterns.anchor.captures(".. note::").is_none());
    }

    #[test]
    fn test_code_block_pattern() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.code_block.captures(".. code-block:: javascript").unwrap();
        assert_eq!(&caps[1], "javascript");
    }

    #[test]
    fn test_code_block_pattern_sourcecode() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.code_block.captures("   .. sourcecode:: sh").unwrap();
        assert_eq!(&caps[1], "sh");
    }

    #[test]
    fn test_code_block_pattern_no_language() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.code_block.captures(".. code-block::").unwrap();
        assert_eq!(&caps[1], "");
    }

    #[test]
    fn test_glossary_pattern() {
        let patterns = MarkupPatterns::new();
        assert!(patterns.glossary.is_match(".. glossary::"));
        assert!(patterns.glossary.is_match("  .. glossary::"));
        assert!(!patterns.glossary.is_match(".. note::"));
    }

    #[test]
    fn test_glossary_pattern_captures_indent() {
        let patterns = MarkupPatterns::new();
        let caps = patterns.glossary.captures("   .. glossary::").unwrap();
        assert_eq!(&caps[1], "   ");
    }

    #[test]
    fn test_patterns_have_names() {
        let patterns = MarkupPatterns::new();
        for p in [
            &patterns.role,
            &patterns.anchor,
            &patterns.code_block,
            &patterns.glossary,
        ] {
            assert!(!p.name.is_empty());
            assert!(!p.description.is_empty());
        }
    }
}
