//! Configuration
//!
//! Loaded from .edugen.yml or ~/.config/edugen/edugen.yml. Read once at
//! startup and passed into the client wiring; never mutated afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::GeminiConfig;

/// Configuration for edugen.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// LLM backend settings.
    pub llm: LlmSettings,

    /// Review-stage overrides.
    pub review: ReviewSettings,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .edugen.yml in current directory
    /// 3. ~/.config/edugen/edugen.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".edugen.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .edugen.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .edugen.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("edugen").join("edugen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_ms == 0 {
            eyre::bail!("llm.timeout-ms must be > 0");
        }
        if self.llm.max_tokens == 0 {
            eyre::bail!("llm.max-tokens must be > 0");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            eyre::bail!("llm.temperature must be within [0.0, 2.0]");
        }
        Ok(())
    }

    /// Client config for the generation stage.
    pub fn generator_client_config(&self) -> GeminiConfig {
        GeminiConfig {
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
            timeout: Duration::from_millis(self.llm.timeout_ms),
        }
    }

    /// Client config for the review stage; same as generation unless a
    /// review model override is set.
    pub fn reviewer_client_config(&self) -> GeminiConfig {
        let mut config = self.generator_client_config();
        if let Some(model) = &self.review.model {
            config.model = model.clone();
        }
        config
    }
}

/// LLM backend settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name.
    pub model: String,

    /// Timeout per LLM call in milliseconds.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Max output tokens per call.
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. Non-zero on purpose: generated lessons are
    /// expected to vary between runs.
    pub temperature: f32,

    /// Environment variable holding the API key.
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            timeout_ms: 300_000, // 5 minutes
            max_tokens: 8192,
            temperature: 0.7,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

/// Review-stage overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Model to use for the review call; defaults to the generation model.
    pub model: Option<String>,
}
