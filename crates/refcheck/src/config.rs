//! Configuration management for refcheck.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "refcheck";

/// Default index database file name.
const DATABASE_FILE_NAME: &str = "index.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REFCHECK_`)
/// 2. TOML config file at `~/.config/refcheck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Corpus scanning configuration.
    pub scan: ScanConfig,
    /// Cross-reference role configuration.
    pub roles: RoleConfig,
    /// Reporting configuration.
    pub report: ReportConfig,
    /// Index configuration.
    pub index: IndexConfig,
}

/// Corpus scanning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions treated as documents.
    pub extensions: Vec<String>,
    /// Directory names skipped during the corpus walk.
    pub excluded_dirs: Vec<String>,
    /// Maximum document size in bytes; larger files are skipped with a warning.
    pub max_file_size: u64,
}

/// Cross-reference role configuration.
///
/// Role names map markup tokens like `:ref:` into a symbol namespace. Corpora
/// often define custom roles (e.g. `:dbcommand:`) that behave like `:ref:`;
/// those can be added to `anchor_roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
    /// Roles that reference named anchors.
    pub anchor_roles: Vec<String>,
    /// Roles that reference glossary terms.
    pub term_roles: Vec<String>,
    /// Roles that reference document paths.
    pub doc_roles: Vec<String>,
    /// Presentational roles to skip entirely.
    pub ignored_roles: Vec<String>,
}

/// Reporting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Treat warnings as failures.
    pub fail_on_warnings: bool,
    /// Accepted `.. code-block::` languages.
    pub code_languages: Vec<String>,
}

/// Index configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path to the index database file.
    /// Defaults to `~/.local/share/refcheck/index.db`
    pub database_path: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["rst".to_string(), "txt".to_string()],
            excluded_dirs: vec![
                "_build".to_string(),
                "_static".to_string(),
                ".git".to_string(),
            ],
            max_file_size: 2_000_000, // 2MB
        }
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            anchor_roles: vec!["ref".to_string()],
            term_roles: vec!["term".to_string()],
            doc_roles: vec!["doc".to_string()],
            ignored_roles: default_ignored_roles(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fail_on_warnings: false,
            code_languages: default_code_languages(),
        }
    }
}

/// Presentational roles that carry no cross-reference semantics.
fn default_ignored_roles() -> Vec<String> {
    [
        "guilabel", "samp", "option", "program", "file", "command", "data", "code", "kbd",
        "menuselection", "abbr", "sub", "sup",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

/// Languages the external renderer's highlighter understands.
fn default_code_languages() -> Vec<String> {
    [
        "javascript",
        "js",
        "sh",
        "bash",
        "console",
        "python",
        "c",
        "cpp",
        "ini",
        "cfg",
        "yaml",
        "json",
        "xml",
        "sql",
        "http",
        "perl",
        "php",
        "ruby",
        "java",
        "csharp",
        "text",
        "none",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `REFCHECK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// Environment keys use `__` between the section and the key so that
    /// snake_case names survive: `REFCHECK_SCAN__MAX_FILE_SIZE=500000` maps
    /// to `scan.max_file_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("REFCHECK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(Error::ConfigValidation {
                message: "scan.extensions must not be empty".to_string(),
            });
        }

        if self.scan.max_file_size == 0 {
            return Err(Error::ConfigValidation {
                message: "scan.max_file_size must be greater than 0".to_string(),
            });
        }

        for role in self
            .roles
            .anchor_roles
            .iter()
            .chain(&self.roles.term_roles)
            .chain(&self.roles.doc_roles)
            .chain(&self.roles.ignored_roles)
        {
            if role.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "role names must not be empty".to_string(),
                });
            }
        }

        // A role may belong to only one namespace
        let mut seen = HashSet::new();
        for role in self
            .roles
            .anchor_roles
            .iter()
            .chain(&self.roles.term_roles)
            .chain(&self.roles.doc_roles)
        {
            if !seen.insert(role.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("role '{role}' is mapped to more than one namespace"),
                });
            }
        }

        Ok(())
    }

    /// Get the index database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.index
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Check whether a file extension is scanned as a document.
    #[must_use]
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.scan
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Check whether a code-block language is accepted.
    #[must_use]
    pub fn is_known_language(&self, language: &str) -> bool {
        self.report
            .code_languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }
}
