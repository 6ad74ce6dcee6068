//! Configuration and path resolution for the CLI.
//!
//! Precedence, highest first:
//! 1. Command-line flags
//! 2. `MEDLOOKUP_*` environment variables
//! 3. `<config dir>/medlookup/config.json`
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use medlookup_core::resolver::{DEFAULT_PRIORITY_NAMES, DEFAULT_STOP_WORDS, DEFAULT_SUGGESTION_LIMIT};
use medlookup_core::LabelHeuristics;
use medlookup_ocr::{OcrOptions, DEFAULT_ENDPOINT, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the catalog file.
pub const CATALOG_ENV: &str = "MEDLOOKUP_CATALOG";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MEDLOOKUP_DATA_DIR";

/// Environment variable holding the OCR.space API key.
pub const OCR_API_KEY_ENV: &str = "MEDLOOKUP_OCR_API_KEY";

/// Database file inside the data directory.
const DATABASE_FILENAME: &str = "medlookup.db";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not determine {0} directory")]
    NoPlatformDir(&'static str),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub ocr: OcrConfig,
    pub suggestion_limit: usize,
    /// Replaces the built-in label priority list when set
    pub priority_names: Option<Vec<String>>,
    /// Replaces the built-in label stop words when set
    pub stop_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            data_dir: None,
            ocr: OcrConfig::default(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            priority_names: None,
            stop_words: None,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.into(),
            language: DEFAULT_LANGUAGE.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the user config file (if any) and apply environment overrides.
    pub fn load() -> ConfigResult<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load a config file, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/medlookup/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medlookup").join("config.json"))
    }

    /// Apply `MEDLOOKUP_*` overrides. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(CATALOG_ENV) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = get(DATA_DIR_ENV) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = get(OCR_API_KEY_ENV) {
            self.ocr.api_key = Some(key);
        }
    }

    /// Catalog file: flag, then config, then the sample shipped in `data/`.
    pub fn catalog_path(&self, flag: Option<&PathBuf>) -> PathBuf {
        flag.or(self.catalog_path.as_ref())
            .cloned()
            .unwrap_or_else(default_catalog_path)
    }

    /// Data directory: flag, then config, then the platform data dir.
    pub fn data_dir(&self, flag: Option<&PathBuf>) -> ConfigResult<PathBuf> {
        if let Some(dir) = flag.or(self.data_dir.as_ref()) {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("medlookup"))
            .ok_or(ConfigError::NoPlatformDir("data"))
    }

    pub fn database_path(&self, flag: Option<&PathBuf>) -> ConfigResult<PathBuf> {
        Ok(self.data_dir(flag)?.join(DATABASE_FILENAME))
    }

    /// Label heuristics with any configured list overrides.
    pub fn heuristics(&self) -> LabelHeuristics {
        match (&self.priority_names, &self.stop_words) {
            (None, None) => LabelHeuristics::new(),
            (priority, stop_words) => LabelHeuristics::with_lists(
                priority
                    .as_deref()
                    .map(|p| p.iter().map(String::as_str).collect::<Vec<_>>())
                    .unwrap_or_else(|| DEFAULT_PRIORITY_NAMES.to_vec()),
                stop_words
                    .as_deref()
                    .map(|s| s.iter().map(String::as_str).collect::<Vec<_>>())
                    .unwrap_or_else(|| DEFAULT_STOP_WORDS.to_vec()),
            ),
        }
    }

    pub fn ocr_options(&self) -> OcrOptions {
        OcrOptions {
            endpoint: self.ocr.endpoint.clone(),
            language: self.ocr.language.clone(),
            timeout: Duration::from_secs(self.ocr.timeout_seconds),
        }
    }
}

/// Workspace `data/medicines.json`.
fn default_catalog_path() -> PathBuf {
    // CARGO_MANIFEST_DIR points to crates/medlookup-cli
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(Path::parent)
        .map(|root| root.join("data").join("medicines.json"))
        .unwrap_or_else(|| PathBuf::from("data/medicines.json"))
}
