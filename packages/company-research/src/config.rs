//! Runtime configuration loaded from the environment.

use std::env;

use anyhow::{Context, Result};

use crate::analyze::DEFAULT_ANALYZE_MODEL;
use crate::fetcher::DEFAULT_RESEARCH_MODEL;

pub const DEFAULT_PORT: u16 = 8000;

/// Load `.env.local` and `.env` into the process environment if present.
///
/// Variables already set win over file contents.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

/// Settings for the parts that call the completion service.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub research_model: String,
    pub analyze_model: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| chat_client::DEFAULT_BASE_URL.to_string()),
            research_model: non_empty("RESEARCH_MODEL")
                .unwrap_or_else(|| DEFAULT_RESEARCH_MODEL.to_string()),
            analyze_model: non_empty("ANALYZE_MODEL")
                .unwrap_or_else(|| DEFAULT_ANALYZE_MODEL.to_string()),
            port: match non_empty("PORT") {
                Some(port) => port.parse().context("PORT must be a valid number")?,
                None => DEFAULT_PORT,
            },
        })
    }

    /// Chat client for the configured service.
    pub fn chat_client(&self) -> chat_client::ChatClient {
        chat_client::ChatClient::new(&self.openai_api_key).with_base_url(&self.openai_base_url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.openai_base_url, chat_client::DEFAULT_BASE_URL);
        assert_eq!(config.research_model, DEFAULT_RESEARCH_MODEL);
        assert_eq!(config.analyze_model, DEFAULT_ANALYZE_MODEL);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_api_key_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        assert!(Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("RESEARCH_MODEL", "gpt-4o"),
            ("PORT", "9001"),
        ]))
        .unwrap();
        assert_eq!(config.research_model, "gpt-4o");
        assert_eq!(config.port, 9001);

        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk"), ("PORT", "http")]));
        assert!(err.is_err());
    }
}
