use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Path to the SQLite database file; None resolves to the platform data dir
    #[serde(default)]
    pub database_path: Option<String>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Translation provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Batch pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Translation provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name passed to the chat-completions endpoint
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the OPENROUTER_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of tokens to generate per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Batch pipeline configuration.
///
/// These are the defaults applied when an invocation request omits a field;
/// every one of them can be overridden per request.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Words per provider call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Cards processed per invocation
    #[serde(default = "default_cards_per_run")]
    pub cards_per_run: usize,

    /// Languages translated concurrently within one chunk
    #[serde(default = "default_parallel_languages")]
    pub parallel_languages: usize,

    /// Wall-clock budget for one invocation, in milliseconds
    #[serde(default = "default_max_execution_time_ms")]
    pub max_execution_time_ms: u64,

    /// Pacing delay between chunks, in milliseconds
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            cards_per_run: default_cards_per_run(),
            parallel_languages: default_parallel_languages(),
            max_execution_time_ms: default_max_execution_time_ms(),
            chunk_delay_ms: default_chunk_delay_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash-lite".to_string()
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.1
}

fn default_batch_size() -> usize {
    15
}

fn default_cards_per_run() -> usize {
    10
}

fn default_parallel_languages() -> usize {
    5
}

fn default_max_execution_time_ms() -> u64 {
    // Safe margin under a 60s scheduler timeout
    45_000
}

fn default_chunk_delay_ms() -> u64 {
    50
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the provider API key, preferring the config value over the
    /// OPENROUTER_API_KEY environment variable
    pub fn resolve_api_key(&self) -> String {
        if !self.provider.api_key.is_empty() {
            return self.provider.api_key.clone();
        }
        std::env::var("OPENROUTER_API_KEY").unwrap_or_default()
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.batch_size == 0 {
            return Err(anyhow!("batch_size must be at least 1"));
        }
        if self.pipeline.cards_per_run == 0 {
            return Err(anyhow!("cards_per_run must be at least 1"));
        }
        if self.pipeline.parallel_languages == 0 {
            return Err(anyhow!("parallel_languages must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.provider.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 1.0"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: None,
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            pipeline: PipelineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
