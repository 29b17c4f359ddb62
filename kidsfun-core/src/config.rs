//! Application configuration.
//!
//! Defaults can be overridden by builder methods or, via
//! [`AppConfig::from_env`], by environment variables (a `.env` file is
//! loaded by the binary before this runs).

use std::path::PathBuf;
use std::time::Duration;

/// Default metrics file, relative to the working directory.
pub const DEFAULT_METRICS_PATH: &str = "kidsfun_metrics.json";

/// Default model for the storyteller.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default storyteller timeout.
pub const DEFAULT_STORY_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the generative storyteller.
#[derive(Clone)]
pub struct StoryTellerConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: usize,
    pub timeout: Duration,
}

impl StoryTellerConfig {
    /// Create a storyteller config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 512,
            timeout: DEFAULT_STORY_TIMEOUT,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max tokens for generated stories.
    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }
}

impl std::fmt::Debug for StoryTellerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keep the key out of logs
        f.debug_struct("StoryTellerConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Top-level configuration for a session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where metrics are persisted. `None` keeps them in memory.
    pub metrics_path: Option<PathBuf>,

    /// Custom story graph (JSON). `None` uses the forest adventure.
    pub story_path: Option<PathBuf>,

    /// Storyteller settings. `None` disables the storyteller.
    pub storyteller: Option<StoryTellerConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            metrics_path: Some(PathBuf::from(DEFAULT_METRICS_PATH)),
            story_path: None,
            storyteller: None,
        }
    }
}

impl AppConfig {
    /// Defaults: metrics in `kidsfun_metrics.json`, forest adventure, no storyteller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `KIDSFUN_METRICS_PATH` | metrics file |
    /// | `ANTHROPIC_API_KEY` | enables the storyteller |
    /// | `KIDSFUN_MODEL` | storyteller model |
    /// | `KIDSFUN_STORY_TIMEOUT_SECS` | storyteller timeout |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(path) = lookup("KIDSFUN_METRICS_PATH").filter(|p| !p.is_empty()) {
            config.metrics_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
            let mut storyteller = StoryTellerConfig::new(key);
            if let Some(model) = lookup("KIDSFUN_MODEL").filter(|m| !m.is_empty()) {
                storyteller = storyteller.with_model(model);
            }
            match lookup("KIDSFUN_STORY_TIMEOUT_SECS").map(|s| s.parse::<u64>()) {
                Some(Ok(secs)) => storyteller = storyteller.with_timeout(Duration::from_secs(secs)),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "ignoring invalid KIDSFUN_STORY_TIMEOUT_SECS")
                }
                None => {}
            }
            config.storyteller = Some(storyteller);
        }

        config
    }

    /// Persist metrics to this file.
    pub fn with_metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Keep metrics in memory only.
    pub fn in_memory(mut self) -> Self {
        self.metrics_path = None;
        self
    }

    /// Load the story graph from a JSON file.
    pub fn with_story_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.story_path = Some(path.into());
        self
    }

    /// Enable the storyteller.
    pub fn with_storyteller(mut self, storyteller: StoryTellerConfig) -> Self {
        self.storyteller = Some(storyteller);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.metrics_path, Some(PathBuf::from(DEFAULT_METRICS_PATH)));
        assert!(config.story_path.is_none());
        assert!(config.storyteller.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("KIDSFUN_METRICS_PATH", "/tmp/kids.json"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("KIDSFUN_MODEL", "claude-haiku"),
            ("KIDSFUN_STORY_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.metrics_path, Some(PathBuf::from("/tmp/kids.json")));
        let storyteller = config.storyteller.unwrap();
        assert_eq!(storyteller.model, "claude-haiku");
        assert_eq!(storyteller.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("KIDSFUN_STORY_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.storyteller.unwrap().timeout, DEFAULT_STORY_TIMEOUT);
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::new()
            .in_memory()
            .with_story_path("castle.json")
            .with_storyteller(StoryTellerConfig::new("key").with_max_tokens(256));

        assert!(config.metrics_path.is_none());
        assert_eq!(config.story_path, Some(PathBuf::from("castle.json")));
        assert_eq!(config.storyteller.unwrap().max_tokens, 256);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", StoryTellerConfig::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
    }
}
