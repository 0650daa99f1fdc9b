//! Configuration for the Critic

use crate::prompt::{Language, ToneMode};
use aphorist_gatekeeper::ValidationConfig;
use aphorist_store::QueryOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Critic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticConfig {
    /// Upper bound on generated tokens per critique
    pub max_tokens: u32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Number of canonical matches to attach
    pub top_k: usize,

    /// Whether unverified quotes may be matched
    pub include_unverified: bool,

    /// Model calls admitted per window
    pub rate_limit_max_calls: usize,

    /// Rate limit window (seconds)
    pub rate_limit_period_secs: u64,

    /// Tone at startup
    pub default_mode: ToneMode,

    /// Response language at startup
    pub default_language: Language,

    /// Input validation thresholds
    pub validation: ValidationConfig,
}

impl Default for CriticConfig {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            request_timeout_secs: 60,
            top_k: aphorist_store::DEFAULT_TOP_K,
            include_unverified: false,
            rate_limit_max_calls: 15,
            rate_limit_period_secs: 60,
            default_mode: ToneMode::Clarity,
            default_language: Language::English,
            validation: ValidationConfig::default(),
        }
    }
}

impl CriticConfig {
    /// Model call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rate limit window as a Duration
    pub fn rate_limit_period(&self) -> Duration {
        Duration::from_secs(self.rate_limit_period_secs)
    }

    /// Query options for corpus matching
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::top(self.top_k).with_unverified(self.include_unverified)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.rate_limit_period_secs == 0 {
            return Err("rate_limit_period_secs must be greater than 0".to_string());
        }
        self.validation.validate()
    }

    /// Lenient preset: more calls per window, longer timeout, unverified matches allowed
    pub fn lenient() -> Self {
        Self {
            request_timeout_secs: 120,
            include_unverified: true,
            rate_limit_max_calls: 60,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CriticConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.rate_limit_max_calls, 15);
        assert_eq!(config.rate_limit_period(), Duration::from_secs(60));
        assert_eq!(config.query_options(), QueryOptions::default());
    }

    #[test]
    fn test_lenient_config_is_valid() {
        let config = CriticConfig::lenient();
        assert!(config.validate().is_ok());
        assert!(config.query_options().include_unverified);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = CriticConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_period_rejected() {
        let config = CriticConfig {
            rate_limit_period_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_validation_bounds_rejected() {
        let mut config = CriticConfig::default();
        config.validation.min_length = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = CriticConfig {
            default_mode: ToneMode::Brutal,
            default_language: Language::French,
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = CriticConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = CriticConfig::from_toml(
            r#"
            top_k = 5
            default_language = "de"

            [validation]
            max_length = 300
            "#,
        )
        .unwrap();
        assert_eq!(parsed.top_k, 5);
        assert_eq!(parsed.default_language, Language::German);
        assert_eq!(parsed.validation.max_length, 300);
        assert_eq!(parsed.validation.min_length, 5);
        assert_eq!(parsed.max_tokens, 500);
    }
}
