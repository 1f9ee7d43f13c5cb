use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default interval between bottom-border redraws while the user types.
pub const DEFAULT_REDRAW_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI locale code (`en`, `es`, `fr`).
    pub locale: String,
    /// Language the transcript is written in.
    pub transcript_language: String,
    pub redraw_interval_ms: u64,
    /// Where `/export` writes files. Defaults to the working directory.
    pub export_dir: Option<PathBuf>,
    pub agent: AgentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            transcript_language: "en".to_string(),
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            export_dir: None,
            agent: AgentConfig::default(),
        }
    }
}

/// Settings for the OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub base_url: String,
    pub model: String,
    /// Inline API key. Prefer `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: None,
        }
    }
}

impl AgentConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

impl Config {
    /// Default location: `<config_dir>/tubechat/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("tubechat").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".tubechat/config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.redraw_interval_ms == 0 {
            return Err(Error::Config(
                "redraw_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.agent.model.trim().is_empty() {
            return Err(Error::Config("agent.model must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.redraw_interval_ms, DEFAULT_REDRAW_INTERVAL_MS);
        assert_eq!(config.agent.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "locale = \"es\"\n\n[agent]\nmodel = \"llama3\"\nbase_url = \"http://localhost:11434/v1\""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.locale, "es");
        assert_eq!(config.transcript_language, "en");
        assert_eq!(config.agent.model, "llama3");
        assert_eq!(config.agent.base_url, "http://localhost:11434/v1");
        assert!(config.agent.temperature.is_none());
    }

    #[test]
    fn zero_redraw_interval_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "redraw_interval_ms = 0").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn inline_api_key_wins_over_env() {
        let agent = AgentConfig {
            api_key: Some("sk-inline".to_string()),
            api_key_env: "TUBECHAT_TEST_UNSET_KEY".to_string(),
            ..AgentConfig::default()
        };
        assert_eq!(agent.resolve_api_key().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn blank_inline_key_is_ignored() {
        let agent = AgentConfig {
            api_key: Some("   ".to_string()),
            api_key_env: "TUBECHAT_TEST_UNSET_KEY".to_string(),
            ..AgentConfig::default()
        };
        assert!(agent.resolve_api_key().is_none());
    }
}
