//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.reel/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::providers::tmdb::DEFAULT_TMDB_BASE_URL;
use crate::core::feed::DEFAULT_TRENDING_COUNT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReelConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Where `reel.log` and the `library/` directory live.
    pub data_dir: Option<String>,
    pub trending_count: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub image_base_url: Option<String>,
    pub language: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub trending_count: usize,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub image_base_url: String,
    pub language: Option<String>,
}

impl ResolvedConfig {
    /// Directory holding the persisted collections.
    pub fn library_dir(&self) -> PathBuf {
        self.data_dir.join("library")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("reel.log")
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.reel`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".reel"))
}

/// Returns the path to `~/.reel/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    default_data_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.reel/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ReelConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ReelConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ReelConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path, generating the template if it is missing.
pub fn load_config_from(path: &Path) -> Result<ReelConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ReelConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ReelConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config without the API key.
fn redacted(config: &ReelConfig) -> String {
    format!(
        "general={:?}, tmdb.base_url={:?}, tmdb.language={:?}, tmdb.api_key set={}",
        config.general,
        config.tmdb.base_url,
        config.tmdb.language,
        config.tmdb.api_key.is_some()
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# reel configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "/home/me/.reel"        # Or set REEL_DATA_DIR env var
# trending_count = 9

# [tmdb]
# api_key = "eyJhbGciOi..."          # TMDB read access token, or set TMDB_API_KEY
# base_url = "https://api.themoviedb.org/3"
# image_base_url = "https://image.tmdb.org/t/p/w500"
# language = "en-US"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_data_dir` is from the `--data-dir` flag (None = not specified).
pub fn resolve(config: &ReelConfig, cli_data_dir: Option<&Path>) -> ResolvedConfig {
    resolve_with_env(config, cli_data_dir, |name| std::env::var(name).ok())
}

fn resolve_with_env(
    config: &ReelConfig,
    cli_data_dir: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Data dir: CLI → env → config → ~/.reel → ./.reel
    let data_dir = cli_data_dir
        .map(Path::to_path_buf)
        .or_else(|| env("REEL_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.general.data_dir.as_ref().map(PathBuf::from))
        .or_else(default_data_dir)
        .unwrap_or_else(|| PathBuf::from(".reel"));

    // API key: env → config
    let tmdb_api_key = env("TMDB_API_KEY")
        .or_else(|| config.tmdb.api_key.clone())
        .filter(|k| !k.trim().is_empty());

    // Base URL: env → config → default
    let tmdb_base_url = env("TMDB_BASE_URL")
        .or_else(|| config.tmdb.base_url.clone())
        .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());

    ResolvedConfig {
        data_dir,
        trending_count: config
            .general
            .trending_count
            .unwrap_or(DEFAULT_TRENDING_COUNT),
        tmdb_api_key,
        tmdb_base_url,
        image_base_url: config
            .tmdb
            .image_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
        language: config.tmdb.language.clone(),
    }
}
