/// Configuration module for visecode.
///
/// Handles loading, validating, and providing default configuration values
/// for the HTTP boundary, the model provider, and the fix reference table.
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Config file used when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "visecode.json";

// ── Default value functions ──────────────────────────────────────────

fn default_bind() -> String {
    "127.0.0.1:9002".to_string()
}

fn default_model_name() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

// ── Config structs ───────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub fix: FixConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Which text-generation backend answers analysis prompts.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    Mock,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Transport timeout. Unset means the call waits for the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Extra bug-id → snippet pairs layered over the built-in archetypes.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FixConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_snippets: Vec<ReferenceSnippet>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReferenceSnippet {
    pub bug_id: String,
    pub snippet: String,
}

// ── Default impls ────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            name: default_model_name(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_secs: None,
        }
    }
}

// ── Config implementation ────────────────────────────────────────────

fn resolve(config_path: &str) -> &str {
    if config_path.is_empty() {
        DEFAULT_CONFIG_PATH
    } else {
        config_path
    }
}

impl ModelConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Read configuration from a JSON file without touching the filesystem.
    ///
    /// An empty `config_path` means [`DEFAULT_CONFIG_PATH`]. A missing file
    /// yields the defaults; so does a file that is not valid JSON, with a
    /// warning naming the parse error.
    pub fn load(config_path: &str) -> Result<Self> {
        let path = resolve(config_path);
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{path} not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("failed to read config: {path}")),
        };

        match serde_json::from_str(&data) {
            Ok(cfg) => {
                info!("Loaded configuration from {path}");
                Ok(cfg)
            }
            Err(e) => {
                warn!("Invalid JSON in {path}, using defaults: {e}");
                Ok(Self::default())
            }
        }
    }

    /// Like [`Config::load`], but first writes a template to
    /// [`DEFAULT_CONFIG_PATH`] when that is the path in use and it is absent.
    /// Used by the long-running server only.
    pub fn load_or_init(config_path: &str) -> Result<Self> {
        let path = resolve(config_path);
        if path == DEFAULT_CONFIG_PATH && !Path::new(path).exists() {
            match Self::default().save(path) {
                Ok(()) => info!("Generated config template: {path}"),
                Err(e) => warn!("Failed to generate config template: {e}"),
            }
        }
        Self::load(path)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("failed to marshal config")?;
        std::fs::write(path, data).with_context(|| format!("failed to write config: {path}"))?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        anyhow::ensure!(!self.model.name.is_empty(), "model.name must not be empty");
        anyhow::ensure!(
            self.model.api_base.starts_with("http://") || self.model.api_base.starts_with("https://"),
            "model.api_base must be an http(s) URL"
        );
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.model.temperature),
            "model.temperature must be within 0.0..=2.0"
        );
        anyhow::ensure!(
            self.model.timeout_secs != Some(0),
            "model.timeout_secs must be positive when set"
        );
        for entry in &self.fix.reference_snippets {
            anyhow::ensure!(
                !entry.bug_id.is_empty() && !entry.snippet.is_empty(),
                "fix.reference_snippets entries need a bug_id and a non-empty snippet"
            );
        }
        Ok(())
    }

    /// Parse the configured bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("invalid server.bind address: {}", self.server.bind))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
