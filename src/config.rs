//! Configuration management
//!
//! Server binding, deployment base path, and letter display limits. Stored as
//! TOML in the platform config directory and created with defaults on first
//! load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Letter archive settings
    #[serde(default)]
    pub letters: LettersConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path prefix the site is mounted under (e.g. "/dear-failure")
    #[serde(default)]
    pub base_path: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_path: String::new(),
        }
    }
}

impl ServerConfig {
    /// Base path with a leading slash and no trailing slash; empty for the root
    pub fn normalized_base_path(&self) -> String {
        normalize_base_path(&self.base_path)
    }
}

/// Normalize a mount prefix: "dear-failure/" -> "/dear-failure", "/" -> ""
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LettersConfig {
    /// Seed file to load instead of the bundled letters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
    /// How many letters the shuffle view shows
    #[serde(default = "default_shuffle_limit")]
    pub shuffle_limit: usize,
    /// How many letters the home page previews
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Characters of content shown in a home page preview
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_shuffle_limit() -> usize {
    50
}

fn default_recent_limit() -> usize {
    3
}

fn default_preview_chars() -> usize {
    100
}

impl Default for LettersConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            shuffle_limit: default_shuffle_limit(),
            recent_limit: default_recent_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, writing defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Load configuration from `path`, writing defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "dear-failure", "dear-failure")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Print the effective configuration
pub fn show_config(config: &Config) {
    println!("Server:");
    println!("  host:          {}", config.server.host);
    println!("  port:          {}", config.server.port);
    println!("  base_path:     {}", display_or(&config.server.normalized_base_path(), "/"));
    println!("Letters:");
    println!(
        "  seed_path:     {}",
        config.letters.seed_path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string())
    );
    println!("  shuffle_limit: {}", config.letters.shuffle_limit);
    println!("  recent_limit:  {}", config.letters.recent_limit);
    println!("  preview_chars: {}", config.letters.preview_chars);
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Reset configuration at `path` to defaults
pub fn reset_config(path: &Path) -> Result<()> {
    Config::default().save_to(path)?;
    println!("Configuration reset to defaults.");
    Ok(())
}

/// Get default configuration as TOML string
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| "# Default configuration\n".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.server.port = 3000;
        config.server.base_path = "/dear-failure".to_string();
        config.letters.seed_path = Some(PathBuf::from("/srv/letters.json"));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[letters]\nshuffle_limit = 10\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.letters.shuffle_limit, 10);
        assert_eq!(config.letters.recent_limit, 3);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = 12").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path("dear-failure"), "/dear-failure");
        assert_eq!(normalize_base_path("/dear-failure/"), "/dear-failure");
    }

    #[test]
    fn test_default_toml_parses() {
        let parsed: Config = toml::from_str(&default_config_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
