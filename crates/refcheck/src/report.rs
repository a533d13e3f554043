//! Diagnostic types and rendering for refcheck.
//!
//! Diagnostics carry a stable code, a severity, a human-readable message, and
//! the location that triggered them.

use serde::Serialize;

use crate::document::Location;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Editorial problem that the renderer tolerates.
    Warning,
    /// Problem that breaks cross-reference resolution.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single finding from the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Stable machine-readable code (e.g. `REF_DANGLING`).
    pub code: &'static str,
    /// Severity of the finding.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Where the problem was found.
    pub location: Location,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    #[must_use]
    pub fn error(code: &'static str, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    /// Create a warning-severity diagnostic.
    #[must_use]
    pub fn warning(code: &'static str, message: impl Into<String>, location: Location) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }

    /// Check if this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

/// Render diagnostics one per line, sorted by location.
#[must_use]
pub fn render_plain(diagnostics: &[Diagnostic]) -> String {
    let mut sorted: Vec<_> = diagnostics.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.location.path, a.location.line).cmp(&(&b.location.path, b.location.line))
    });

    let mut out = String::new();
    for d in sorted {
        out.push_str(&d.to_string());
        out.push('\n');
    }
    out
}

/// Render diagnostics as an aligned table.
#[must_use]
pub fn render_table(diagnostics: &[Diagnostic]) -> String {
    let mut sorted: Vec<_> = diagnostics.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.location.path, a.location.line).cmp(&(&b.location.path, b.location.line))
    });

    let loc_width = sorted
        .iter()
        .map(|d| d.location.to_string().len())
        .max()
        .unwrap_or(8)
        .max("LOCATION".len());
    let code_width = sorted
        .iter()
        .map(|d| d.code.len())
        .max()
        .unwrap_or(4)
        .max("CODE".len());

    let mut out = format!(
        "{:<loc_width$}  {:<8}  {:<code_width$}  MESSAGE\n",
        "LOCATION", "SEVERITY", "CODE"
    );
    for d in sorted {
        out.push_str(&format!(
            "{:<loc_width$}  {:<8}  {:<code_width$}  {}\n",
            d.location.to_string(),
            d.severity.to_string(),
            d.code,
            d.message
        ));
    }
    out
}
