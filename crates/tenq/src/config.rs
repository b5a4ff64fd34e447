//! Environment-driven configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `TENQ_USER_AGENT` | `tenq/0.1 (research@example.com)` |
//! | `TENQ_ARCHIVE_BASE` | `https://www.sec.gov/Archives` |
//! | `TENQ_SUMMARY_API_KEY` | `GROQ_API_KEY`, else unset |
//! | `TENQ_SUMMARY_URL` | Groq chat-completions endpoint |
//! | `TENQ_SUMMARY_MODEL` | `llama-3.3-70b-versatile` |
//!
//! Blank values count as unset.

use crate::error::{Result, TenqError};
use crate::summary::{DEFAULT_SUMMARY_MODEL, DEFAULT_SUMMARY_URL};
use tenq_data::edgar::{ARCHIVE_BASE_URL, DEFAULT_USER_AGENT};

/// Settings for the summarization endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Bearer token; summarization is unavailable without one
    pub api_key: Option<String>,
    /// Chat-completions endpoint
    pub url: String,
    /// Model name sent with every request
    pub model: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            url: DEFAULT_SUMMARY_URL.to_string(),
            model: DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }
}

impl SummaryConfig {
    /// The API key, or a configuration error naming the variables to set.
    ///
    /// # Errors
    /// Returns `TenqError::Config` when no key is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            TenqError::Config(
                "summarization needs TENQ_SUMMARY_API_KEY or GROQ_API_KEY to be set".to_string(),
            )
        })
    }
}

impl std::fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("url", &self.url)
            .field("model", &self.model)
            .finish()
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Identifying User-Agent sent on every archive request
    pub user_agent: String,
    /// Archive root the index URLs are built under
    pub archive_base: String,
    /// Summarization settings
    pub summary: SummaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            archive_base: ARCHIVE_BASE_URL.to_string(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            user_agent: get("TENQ_USER_AGENT").unwrap_or(defaults.user_agent),
            archive_base: get("TENQ_ARCHIVE_BASE").unwrap_or(defaults.archive_base),
            summary: SummaryConfig {
                api_key: get("TENQ_SUMMARY_API_KEY").or_else(|| get("GROQ_API_KEY")),
                url: get("TENQ_SUMMARY_URL").unwrap_or(defaults.summary.url),
                model: get("TENQ_SUMMARY_MODEL").unwrap_or(defaults.summary.model),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.archive_base, "https://www.sec.gov/Archives");
        assert!(config.summary.api_key.is_none());
        assert!(config.summary.require_api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TENQ_USER_AGENT", "Jane Doe jane@example.com"),
            ("TENQ_ARCHIVE_BASE", "http://localhost:8080/Archives"),
            ("TENQ_SUMMARY_MODEL", "llama-3.1-8b-instant"),
            ("TENQ_SUMMARY_API_KEY", "primary"),
            ("GROQ_API_KEY", "secondary"),
        ]));
        assert_eq!(config.user_agent, "Jane Doe jane@example.com");
        assert_eq!(config.archive_base, "http://localhost:8080/Archives");
        assert_eq!(config.summary.model, "llama-3.1-8b-instant");
        assert_eq!(config.summary.require_api_key().unwrap(), "primary");
    }

    #[test]
    fn test_groq_key_fallback_and_blank_values() {
        let config = Config::from_lookup(lookup(&[
            ("TENQ_SUMMARY_API_KEY", "   "),
            ("GROQ_API_KEY", "gsk_test"),
            ("TENQ_USER_AGENT", ""),
        ]));
        assert_eq!(config.summary.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::from_lookup(lookup(&[("GROQ_API_KEY", "gsk_secret")]));
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
