//! Corpus walker for refcheck.
//!
//! Recursively collects document files under a root directory and loads them
//! into [`Document`]s with their content address.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::document::Document;
use crate::error::{Error, Result};

/// Walks a docs tree and loads documents.
#[derive(Debug, Clone)]
pub struct CorpusWalker {
    extensions: Vec<String>,
    excluded_dirs: Vec<String>,
    max_file_size: u64,
}

impl CorpusWalker {
    /// Create a walker from the scan section of the app config.
    #[must_use]
    pub fn new(scan: &ScanConfig) -> Self {
        Self {
            extensions: scan.extensions.clone(),
            excluded_dirs: scan.excluded_dirs.clone(),
            max_file_size: scan.max_file_size,
        }
    }

    /// Load every document under `root`, sorted by corpus-relative path.
    ///
    /// Oversized and non-UTF-8 files are skipped with a warning; directories
    /// named in the exclusion list are not descended into.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a directory or a directory listing
    /// fails.
    pub fn load(&self, root: impl AsRef<Path>) -> Result<Vec<Document>> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::corpus_root(root));
        }

        let mut documents = Vec::new();
        self.visit(root, root, &mut documents)?;
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            root = %root.display(),
            documents = documents.len(),
            "Corpus loaded"
        );
        Ok(documents)
    }

    fn visit(&self, root: &Path, dir: &Path, documents: &mut Vec<Document>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                if !self.is_excluded_dir(&path) {
                    self.visit(root, &path, documents)?;
                }
                continue;
            }
            if !file_type.is_file() || !self.is_document(&path) {
                continue;
            }

            let size = entry.metadata()?.len();
            if size > self.max_file_size {
                warn!(path = %path.display(), size, "Skipping oversized document");
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(content) => {
                    documents.push(Document::new(relative_path(root, &path), content));
                }
                Err(source) if source.kind() == std::io::ErrorKind::InvalidData => {
                    warn!(path = %path.display(), "Skipping non-UTF-8 document");
                }
                Err(source) => {
                    return Err(Error::DocumentRead { path, source });
                }
            }
        }
        Ok(())
    }

    fn is_excluded_dir(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.excluded_dirs.iter().any(|d| d == name))
    }

    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

impl Default for CorpusWalker {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

/// Compute the corpus-relative path with forward slashes.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
