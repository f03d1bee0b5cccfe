//! Configuration file management for lessonbot.
//!
//! Provides a TOML-based config file at `~/.config/lessonbot/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use lessonbot_core::client::{ClientConfig, DEFAULT_BASE_URL};

/// Environment variable overriding the backend URL.
pub const BACKEND_URL_ENV: &str = "LESSONBOT_BACKEND_URL";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub backend: BackendSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackendSection {
    /// Base URL of the lesson-plan generation service.
    pub url: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the lessonbot config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/lessonbot` or
/// `~/.config/lessonbot`, also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("lessonbot");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("lessonbot")
}

/// Return the path to the lessonbot config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(config)
}

/// Serialize and write the config file to `path`, creating parent dirs.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

/// Write the config file, refusing to clobber an existing one unless `force`.
pub fn init_config(path: &Path, url: &str, force: bool) -> Result<ConfigFile> {
    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    validate_url(url)?;
    let cfg = ConfigFile {
        backend: BackendSection {
            url: url.to_string(),
        },
    };
    save_config_to(&cfg, path)?;
    Ok(cfg)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("backend URL must start with http:// or https://, got {url:?}");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct LessonbotConfig {
    pub client_config: ClientConfig,
}

impl LessonbotConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// A config file that exists but does not parse is an error; a missing
    /// file just falls through to the default.
    pub fn resolve(cli_backend_url: Option<&str>) -> Result<Self> {
        Self::resolve_with(cli_backend_url, &config_path())
    }

    pub fn resolve_with(cli_backend_url: Option<&str>, path: &Path) -> Result<Self> {
        let base_url = if let Some(url) = cli_backend_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            url
        } else if path.exists() {
            load_config_from(path)?.backend.url
        } else {
            DEFAULT_BASE_URL.to_string()
        };

        validate_url(&base_url)
            .with_context(|| format!("invalid backend URL {base_url:?}"))?;
        tracing::debug!(%base_url, "resolved backend URL");

        Ok(Self {
            client_config: ClientConfig::new(base_url.trim()),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
