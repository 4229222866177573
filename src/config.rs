//! Analysis configuration.
//!
//! A TOML document selects which metrics run and where data lives:
//!
//! ```toml
//! experiment_name = "speeches"
//!
//! [lexical]
//! word_length = true
//! sentiment = false
//!
//! [lexical.richness]
//! window = 50
//!
//! [syntactic]
//! paragraph_length = false
//!
//! [data]
//! data_path = "data/speeches.json"
//! target_key = "text"
//! ```
//!
//! Every switch defaults to `true`; only `experiment_name` and
//! `data.data_path` are required.

use crate::lexical::DEFAULT_MATTR_WINDOW;
use crate::models::{POS_FREQUENCY, SCALAR_COLUMNS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Data path {0} does not exist")]
    DataPathMissing(PathBuf),
    #[error("Data path {0} is not a file")]
    DataPathNotFile(PathBuf),
    #[error("Data path {0} must be a JSON file (.json)")]
    DataPathNotJson(PathBuf),
    #[error("MATTR window must be greater than zero")]
    InvalidWindow,
    #[error("Target key must not be empty")]
    EmptyTargetKey,
}

fn enabled() -> bool {
    true
}

fn default_window() -> usize {
    DEFAULT_MATTR_WINDOW
}

fn default_target_key() -> String {
    "answer".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichnessConfig {
    #[serde(default = "enabled")]
    pub ttr: bool,
    #[serde(default = "enabled")]
    pub mattr: bool,
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Default for RichnessConfig {
    fn default() -> Self {
        Self {
            ttr: true,
            mattr: true,
            window: DEFAULT_MATTR_WINDOW,
        }
    }
}

impl RichnessConfig {
    pub fn any(&self) -> bool {
        self.ttr || self.mattr
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegomenaConfig {
    #[serde(default = "enabled")]
    pub hapax: bool,
    #[serde(default = "enabled")]
    pub dislegomena: bool,
    #[serde(default = "enabled")]
    pub trilegomina: bool,
}

impl Default for LegomenaConfig {
    fn default() -> Self {
        Self {
            hapax: true,
            dislegomena: true,
            trilegomina: true,
        }
    }
}

impl LegomenaConfig {
    pub fn any(&self) -> bool {
        self.hapax || self.dislegomena || self.trilegomina
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalConfig {
    #[serde(default = "enabled")]
    pub word_length: bool,
    #[serde(default = "enabled")]
    pub function_words: bool,
    #[serde(default = "enabled")]
    pub sentiment: bool,
    #[serde(default = "enabled")]
    pub readability: bool,
    #[serde(default)]
    pub richness: RichnessConfig,
    #[serde(default)]
    pub legomena: LegomenaConfig,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            word_length: true,
            function_words: true,
            sentiment: true,
            readability: true,
            richness: RichnessConfig::default(),
            legomena: LegomenaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntacticConfig {
    #[serde(default = "enabled")]
    pub pos_frequency: bool,
    #[serde(default = "enabled")]
    pub sentence_length: bool,
    #[serde(default = "enabled")]
    pub paragraph_length: bool,
}

impl Default for SyntacticConfig {
    fn default() -> Self {
        Self {
            pos_frequency: true,
            sentence_length: true,
            paragraph_length: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_path: PathBuf,
    #[serde(default = "default_target_key")]
    pub target_key: String,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl DataConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            target_key: default_target_key(),
            output_path: default_output_path(),
        }
    }

    /// Check that the data path names an existing `.json` file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_data_path(&self.data_path)?;
        if self.target_key.is_empty() {
            return Err(ConfigError::EmptyTargetKey);
        }
        Ok(())
    }
}

/// Full configuration for one corpus run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub experiment_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub lexical: LexicalConfig,
    #[serde(default)]
    pub syntactic: SyntacticConfig,
    pub data: DataConfig,
}

impl AnalysisConfig {
    /// Configuration with every metric enabled.
    pub fn new(experiment_name: impl Into<String>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            experiment_name: experiment_name.into(),
            description: None,
            lexical: LexicalConfig::default(),
            syntactic: SyntacticConfig::default(),
            data: DataConfig::new(data_path),
        }
    }

    /// Parse without touching the filesystem.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_metrics()?;
        self.data.validate()
    }

    /// Metric settings only; the data section is not checked.
    pub fn validate_metrics(&self) -> Result<(), ConfigError> {
        if self.lexical.richness.mattr && self.lexical.richness.window == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(())
    }

    /// Whether the named output column is produced under this configuration.
    pub fn is_column_enabled(&self, column: &str) -> bool {
        let lexical = &self.lexical;
        match column {
            POS_FREQUENCY => self.syntactic.pos_frequency,
            "function_word_frequency" => lexical.function_words,
            "richness.ttr" => lexical.richness.ttr,
            "richness.mattr" => lexical.richness.mattr,
            "legomena.hapax" => lexical.legomena.hapax,
            "legomena.dislegomena" => lexical.legomena.dislegomena,
            "legomena.trilegomina" => lexical.legomena.trilegomina,
            "readability.flesch_kincaid" => lexical.readability,
            c if c.starts_with("word_length.") => lexical.word_length,
            c if c.starts_with("sentiment.") => lexical.sentiment,
            c if c.starts_with("syntactic.sentence_length.") => self.syntactic.sentence_length,
            c if c.starts_with("syntactic.paragraph_length.") => self.syntactic.paragraph_length,
            _ => false,
        }
    }

    /// Enabled columns in container order.
    pub fn enabled_columns(&self) -> Vec<&'static str> {
        SCALAR_COLUMNS
            .iter()
            .copied()
            .chain(std::iter::once(POS_FREQUENCY))
            .filter(|c| self.is_column_enabled(c))
            .collect()
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AnalysisConfig::from_toml_str(&source)?;
    config.validate()?;

    log::info!("Loaded config for experiment '{}'", config.experiment_name);
    log::info!("Data path: {}", config.data.data_path.display());
    log::info!("Output path: {}", config.data.output_path.display());

    Ok(config)
}

/// Validate that `path` exists, is a regular file and has a `.json` extension.
pub fn validate_data_path(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::DataPathMissing(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ConfigError::DataPathNotFile(path.to_path_buf()));
    }
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ConfigError::DataPathNotJson(path.to_path_buf()));
    }
    Ok(())
}
