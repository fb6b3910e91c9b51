// src/config.rs

//! Store configuration
//!
//! All behaviour switches for the catalog live in one `StoreConfig`, which
//! can be built in code or read from a TOML file:
//!
//! ```toml
//! [add]
//! use_unique_id = true
//! prefer_local = false
//!
//! [load]
//! ignore_invalid = true
//!
//! [search]
//! locales = ["de_DE", "de", "C"]
//! workers = 4
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Default number of threads used to build search caches
pub const DEFAULT_SEARCH_WORKERS: usize = 4;

/// Tokens shorter than this are never indexed
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 3;

/// How `Store::add` finds an existing component to reconcile with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddFlags {
    /// Reconcile by identity equality instead of by bare ID
    pub use_unique_id: bool,
    /// Locally installed formats always beat remote catalog entries
    pub prefer_local: bool,
    /// Retry ID lookups with the `.desktop` suffix toggled
    pub use_merge_heuristic: bool,
}

/// How bulk loads treat individual source files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadFlags {
    /// Skip files that fail to parse instead of aborting the load
    pub ignore_invalid: bool,
    /// Drop translations for locales not in `search.locales`
    pub only_native_languages: bool,
}

/// Search token cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Locales whose text is indexed, most preferred first
    pub locales: Vec<String>,
    /// Size of the worker pool used by `Store::build_search_caches`
    pub workers: usize,
    /// Pass tokens through the stemmer
    pub stemming: bool,
    /// Shortest token that is indexed
    pub min_token_length: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            workers: DEFAULT_SEARCH_WORKERS,
            stemming: true,
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
        }
    }
}

/// Complete store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub add: AddFlags,
    pub load: LoadFlags,
    pub search: SearchConfig,
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid store configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.search.workers == 0 {
            return Err(Error::ConfigError(
                "search.workers must be at least 1".to_string(),
            ));
        }
        if self.search.locales.is_empty() {
            return Err(Error::ConfigError(
                "search.locales must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Enable reconciliation by identity equality
    pub fn with_unique_id(mut self) -> Self {
        self.add.use_unique_id = true;
        self
    }

    /// Enable prefer-local precedence
    pub fn with_prefer_local(mut self) -> Self {
        self.add.prefer_local = true;
        self
    }

    /// Set the indexed locales
    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether a locale is one this process indexes
    pub fn is_native_locale(&self, locale: &str) -> bool {
        self.search.locales.iter().any(|l| l == locale)
    }
}

/// Locales of the current process, most preferred first, always ending in `C`
///
/// Reads `LANGUAGE`, then `LC_ALL`, `LC_MESSAGES` and `LANG`. A value like
/// `de_DE.UTF-8@euro` contributes `de_DE` and `de`.
pub fn default_locales() -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    if let Ok(language) = env::var("LANGUAGE") {
        raw.extend(language.split(':').map(str::to_string));
    }
    for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Ok(value) = env::var(var)
            && !value.is_empty()
        {
            raw.push(value);
            break;
        }
    }
    locales_from_names(&raw)
}

/// Expand raw locale names into the ordered fallback list
pub fn locales_from_names(names: &[String]) -> Vec<String> {
    let mut locales: Vec<String> = Vec::new();
    let mut push = |value: &str| {
        if !value.is_empty() && value != "C" && value != "POSIX" && !locales.iter().any(|l| l == value)
        {
            locales.push(value.to_string());
        }
    };

    for name in names {
        let base = name.split(['.', '@']).next().unwrap_or_default();
        push(base);
        if let Some((lang, _territory)) = base.split_once('_') {
            push(lang);
        }
    }
    locales.push("C".to_string());
    locales
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(!config.add.use_unique_id);
        assert!(!config.add.prefer_local);
        assert_eq!(config.search.workers, DEFAULT_SEARCH_WORKERS);
        assert_eq!(config.search.locales.last().map(String::as_str), Some("C"));
    }

    #[test]
    fn test_from_toml() {
        let config = StoreConfig::from_toml(
            r#"
            [add]
            use_unique_id = true

            [load]
            ignore_invalid = true

            [search]
            locales = ["de", "C"]
            workers = 2
            "#,
        )
        .unwrap();
        assert!(config.add.use_unique_id);
        assert!(config.load.ignore_invalid);
        assert_eq!(config.search.locales, vec!["de", "C"]);
        assert_eq!(config.search.workers, 2);
        assert_eq!(config.search.min_token_length, DEFAULT_MIN_TOKEN_LENGTH);
    }

    #[test]
    fn test_from_toml_rejects_zero_workers() {
        let err = StoreConfig::from_toml("[search]\nworkers = 0\nlocales = [\"C\"]\n").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_toml_roundtrip_keeps_flags() {
        let config = StoreConfig::default().with_prefer_local().with_locales(["fr", "C"]);
        let text = config.to_toml().unwrap();
        assert_eq!(StoreConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_locales_from_names() {
        let locales = locales_from_names(&["de_DE.UTF-8@euro".to_string()]);
        assert_eq!(locales, vec!["de_DE", "de", "C"]);

        let locales = locales_from_names(&["C".to_string()]);
        assert_eq!(locales, vec!["C"]);

        let locales = locales_from_names(&["en_GB".to_string(), "en_US".to_string()]);
        assert_eq!(locales, vec!["en_GB", "en", "en_US", "C"]);
    }
}
