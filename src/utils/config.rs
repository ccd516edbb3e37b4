//! TOML-based configuration for handoff
//!
//! Everything has a default, so `handoff.toml` is optional. Secrets never live
//! in the file: `llm.api_key_env` names the environment variable holding the
//! API key, which may also come from a local `.env` file.
//!
//! ```toml
//! log_level = "info"
//!
//! [llm]
//! api_key_env = "OPENAI_API_KEY"
//! api_base = "https://api.openai.com/v1"
//! model = "gpt-4o"
//! max_turns = 10
//!
//! [voice]
//! model = "gpt-4o-mini"
//! record_seconds = 5
//!
//! [search]
//! base_url = "https://api.duckduckgo.com"
//! max_topics = 5
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "handoff.toml";

/// Root configuration structure loaded from handoff.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HandoffConfig {
    pub log_level: String,
    pub llm: LlmConfig,
    pub voice: VoiceConfig,
    pub search: SearchConfig,
    pub demo: DemoConfig,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            llm: LlmConfig::default(),
            voice: VoiceConfig::default(),
            search: SearchConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub api_base: String,
    /// Model used by agents without their own model override
    pub model: String,
    /// Model calls allowed per run before giving up
    pub max_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_turns: 10,
        }
    }
}

// ============= Voice Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// Model pinned on every voice agent
    pub model: String,
    pub stt_model: String,
    pub tts_model: String,
    pub voice: String,
    /// Microphone capture length per turn
    pub record_seconds: u32,
    /// Length of the synthetic silent input when no microphone is used
    pub silence_seconds: u32,
    pub workflow_name: String,
    /// Log transcripts and replies at debug level
    pub include_sensitive_data: bool,
}

/// Workflow name for single silent test turns
pub const DEFAULT_WORKFLOW_NAME: &str = "MultiAgentVoice";
/// Workflow name for continuous microphone sessions
pub const INTERACTIVE_WORKFLOW_NAME: &str = "InteractiveMultiAgentVoice";

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            stt_model: "gpt-4o-transcribe".to_string(),
            tts_model: "gpt-4o-mini-tts".to_string(),
            voice: "ash".to_string(),
            record_seconds: 5,
            silence_seconds: 3,
            workflow_name: DEFAULT_WORKFLOW_NAME.to_string(),
            include_sensitive_data: true,
        }
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub max_topics: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.duckduckgo.com".to_string(),
            max_topics: 5,
        }
    }
}

// ============= Demo Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Pause between fixed demo queries
    pub delay_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { delay_secs: 3 }
    }
}

// ============= Errors =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0} environment variable is not set. Please set it in a .env file or export it.")]
    MissingEnvVar(String),
}

impl HandoffConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    ///
    /// Only the default path may be absent; an explicitly requested file
    /// that does not exist is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HandoffConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `OPENAI_BASE_URL` wins over the file for the API base
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base) = env::var("OPENAI_BASE_URL") {
            if !base.trim().is_empty() {
                self.llm.api_base = base;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_turns must be at least 1".to_string(),
            ));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".to_string(),
            ));
        }
        if self.voice.record_seconds == 0 || self.voice.silence_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "voice capture lengths must be at least 1 second".to_string(),
            ));
        }
        if self.search.max_topics == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_topics must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingEnvVar(self.llm.api_key_env.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HandoffConfig::default();
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.max_turns, 10);
        assert_eq!(config.voice.model, "gpt-4o-mini");
        assert_eq!(config.voice.record_seconds, 5);
        assert_eq!(config.voice.silence_seconds, 3);
        assert_eq!(config.search.max_topics, 5);
        assert_eq!(config.demo.delay_secs, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HandoffConfig::from_toml_str(
            r#"
            log_level = "debug"

            [llm]
            model = "gpt-4.1-mini"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.llm.api_base, "https://api.openai.com/v1");
        assert_eq!(config.voice.workflow_name, "MultiAgentVoice");
    }

    #[test]
    fn test_zero_max_turns_rejected() {
        let result = HandoffConfig::from_toml_str("[llm]\nmax_turns = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = HandoffConfig::from_toml_str("[llm\nmodel = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = HandoffConfig::load("/definitely/not/here/handoff.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_api_key_env() {
        let mut config = HandoffConfig::default();
        config.llm.api_key_env = "HANDOFF_TEST_KEY_THAT_IS_NEVER_SET".to_string();

        let err = config.api_key().unwrap_err();
        assert!(err
            .to_string()
            .starts_with("HANDOFF_TEST_KEY_THAT_IS_NEVER_SET environment variable is not set"));
    }
}
