//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use slot_engine::ResolverConfig;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Slot grid, working window, and ranking settings.
    pub resolver: ResolverConfig,
    /// Anthropic API key. Falls back to `ANTHROPIC_API_KEY` when unset.
    pub anthropic_api_key: Option<String>,
    /// Claude model used for parsing and preference analysis.
    pub model: String,
    /// Per-request timeout for Claude calls, in seconds.
    pub timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("resolver", &self.resolver)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            anthropic_api_key: None,
            model: slot_llm::DEFAULT_MODEL.to_string(),
            timeout_secs: slot_llm::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Sources, lowest priority first: defaults, `<config dir>/slots/config.toml`,
    /// the given file, then `SLOTS_*` environment variables.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Nested keys use a double underscore, e.g. SLOTS_RESOLVER__TOP_N=5.
        figment = figment.merge(Env::prefixed("SLOTS_").split("__"));

        let mut config: Self = figment.extract()?;
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        config.anthropic_api_key = config
            .anthropic_api_key
            .filter(|key| !key.trim().is_empty());
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns the platform-specific config directory for slots.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("slots"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_resolver_defaults() {
        let config = Config::default();
        assert_eq!(config.resolver, ResolverConfig::default());
        assert_eq!(config.model, slot_llm::DEFAULT_MODEL);
        assert_eq!(config.timeout(), slot_llm::DEFAULT_TIMEOUT);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config {
            anthropic_api_key: Some("sk-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_file_overrides_resolver_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "model = \"test-model\"\n[resolver]\ntop_n = 5\ngranularity_minutes = 15\nwork_start = [8, 30]\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.model, "test-model");
        assert_eq!(config.resolver.top_n, 5);
        assert_eq!(config.resolver.granularity_minutes, 15);
        assert_eq!(config.resolver.work_start.to_string(), "08:30");
        assert_eq!(config.resolver.work_end.to_string(), "17:00");
    }
}
