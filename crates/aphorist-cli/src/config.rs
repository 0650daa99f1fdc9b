//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use aphorist_critic::CriticConfig;
use aphorist_llm::huggingface::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the API token, unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "HF_API_KEY";

/// Environment variable overriding the model id
pub const MODEL_ID_ENV: &str = "MODEL_ID";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Corpus location
    #[serde(default)]
    pub corpus: CorpusSettings,

    /// Inference endpoint
    #[serde(default)]
    pub model: ModelSettings,

    /// Critique behaviour
    #[serde(default)]
    pub critic: CriticConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// REPL history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Where the quote corpus lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSettings {
    /// Path to the `{"quotes": [...]}` document
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,

    /// Skip malformed records instead of refusing to start
    #[serde(default)]
    pub skip_invalid: bool,
}

/// Inference endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Base URL of the chat completions endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Token stored in the file (the environment variable wins)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config and REPL history.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".aphorist"))
    }

    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `MODEL_ID` and the API key variable from `lookup`.
    ///
    /// `lookup` is normally `std::env::var(..).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model_id) = lookup(MODEL_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.model.model_id = model_id;
        }
        if let Some(key) = lookup(&self.model.api_key_env).filter(|v| !v.trim().is_empty()) {
            self.model.api_key = Some(key);
        }
    }

    /// Check settings that would only fail later at runtime.
    pub fn validate(&self) -> Result<()> {
        self.critic.validate().map_err(CliError::Config)?;
        if self.model.endpoint.trim().is_empty() {
            return Err(CliError::Config("model.endpoint must not be empty".into()));
        }
        if self.model.model_id.trim().is_empty() {
            return Err(CliError::Config("model.model_id must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
            skip_invalid: false,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            api_key_env: default_api_key_env(),
            api_key: None,
            max_retries: default_max_retries(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/quotes_db.json")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
