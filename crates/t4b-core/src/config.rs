//! Configuration management for t4b.
//!
//! Loads configuration from ${T4B_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;

use crate::api::ApiConfig;

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "T4B_API_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, run `cargo run -p xtask -- update-default-config`.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Parses the commented template and writes every top-level value of
/// `values` over it, so template comments survive and set keys win.
///
/// The config is flat. Keys the template does not know are kept as-is.
fn overlay_on_template(values: &str, origin: &str) -> Result<DocumentMut> {
    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let source: DocumentMut = values
        .parse()
        .with_context(|| format!("Failed to parse {origin}"))?;

    for (key, item) in source.iter() {
        if item.is_none() {
            continue;
        }
        if !doc.contains_key(key) {
            tracing::debug!(key, "keeping config key not in template");
        }
        doc[key] = item.clone();
    }

    Ok(doc)
}

pub mod paths {
    //! Path resolution for t4b configuration and data files.
    //!
    //! `T4B_HOME` resolution order:
    //! 1. `T4B_HOME` environment variable (if set)
    //! 2. ~/.config/t4b (default)

    use std::path::PathBuf;

    /// Returns the t4b home directory.
    ///
    /// Checks `T4B_HOME` first, falls back to ~/.config/t4b, then to a
    /// relative `.t4b` directory when no home directory is known.
    pub fn t4b_home() -> PathBuf {
        if let Ok(home) = std::env::var("T4B_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".t4b"),
            |h| h.join(".config").join("t4b"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        t4b_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        t4b_home().join("session.json")
    }

    /// Returns the directory that holds log files.
    pub fn logs_dir() -> PathBuf {
        t4b_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API (e.g. `http://localhost:8000/api/v1`)
    pub api_url: String,

    /// City used by the weather command when none is given
    pub default_city: Option<String>,

    /// Log filter directive for the log file
    pub log_level: String,

    /// Request timeout in seconds (0 disables)
    pub timeout_secs: u32,
}

impl Config {
    pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
    const DEFAULT_LOG_LEVEL: &str = "info";
    /// Default is disabled
    const DEFAULT_TIMEOUT_SECS: u32 = 0;

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL with precedence: override > env > config > default.
    ///
    /// # Errors
    /// Returns an error if the selected URL is not a valid absolute URL.
    pub fn resolve_api_url(&self, override_url: Option<&str>) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        let candidates = [override_url, env_url.as_deref(), Some(self.api_url.as_str())];

        let chosen = candidates
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(Self::DEFAULT_API_URL);

        url::Url::parse(chosen).with_context(|| format!("Invalid API base URL: {chosen}"))?;
        Ok(chosen.trim_end_matches('/').to_string())
    }

    /// Builds the transport configuration for this config.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid.
    pub fn api_config(&self, override_url: Option<&str>) -> Result<ApiConfig> {
        Ok(ApiConfig {
            base_url: self.resolve_api_url(override_url)?,
            timeout: self.timeout(),
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.timeout_secs)))
        }
    }

    /// Returns the configured default city, ignoring blank values.
    pub fn default_city(&self) -> Option<&str> {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
    }

    /// Saves only the `default_city` field to the config file.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or written.
    pub fn save_default_city(city: &str) -> Result<()> {
        Self::save_default_city_to(&paths::config_path(), city)
    }

    /// Saves only the `default_city` field to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or written.
    pub fn save_default_city_to(path: &Path, city: &str) -> Result<()> {
        let user_config = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            String::new()
        };

        let mut doc = overlay_on_template(&user_config, &path.display().to_string())?;
        doc["default_city"] = toml_edit::value(city.trim());

        Self::write_config(path, &doc.to_string())
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `xtask update-default-config` to keep `default_config.toml`
    /// in sync with `Config::default()`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn generate() -> Result<String> {
        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        Ok(overlay_on_template(&generated_toml, "generated config")?.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            default_city: None,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}
