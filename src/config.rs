use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Which hosted model family a session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAi,
    None,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Anthropic => write!(f, "anthropic"),
            Provider::OpenAi => write!(f, "openai"),
            Provider::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_criteria")]
    pub default_criteria: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_max_tokens() -> u32 {
    // Covers the thinking budget plus the full idea list.
    20_000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_criteria() -> Vec<String> {
    vec![
        "Impact on #1 product metric".to_string(),
        "Confidence in impact".to_string(),
        "Low implementation effort".to_string(),
        "Level of innovation".to_string(),
    ]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("ideation_outputs")
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            default_criteria: default_criteria(),
            output_dir: default_output_dir(),
            anthropic_base_url: default_anthropic_base_url(),
            openai_base_url: default_openai_base_url(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".ideation").join("config.yaml")
    }

    /// Load the config file if present, fall back to defaults otherwise,
    /// then let environment variables override the API keys.
    pub fn load_or_default() -> Self {
        let config_path = Self::get_config_path();
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path).unwrap_or_default()
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config
    }

    /// MY_API_KEY is an alias for the Anthropic key and wins over it.
    fn apply_env_overrides(&mut self) {
        if let Some(key) = env_non_empty("MY_API_KEY").or_else(|| env_non_empty("ANTHROPIC_API_KEY"))
        {
            self.anthropic_api_key = Some(key);
        }
        if let Some(key) = env_non_empty("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.anthropic_api_key.is_some() || self.openai_api_key.is_some()
    }

    /// The first available credential, Anthropic preferred.
    pub fn api_key(&self) -> Option<&str> {
        self.anthropic_api_key
            .as_deref()
            .or(self.openai_api_key.as_deref())
    }

    pub fn provider(&self) -> Provider {
        if self.anthropic_api_key.is_some() {
            Provider::Anthropic
        } else if self.openai_api_key.is_some() {
            Provider::OpenAi
        } else {
            Provider::None
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
