//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sidekick/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::api::csrf::token_from_cookies;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SidekickConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub widget: WidgetConfig,
    #[serde(default)]
    pub mount: MountConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub csrf_token: Option<String>,
    /// Browser-style cookie string ("a=1; csrftoken=abc"). Used as a token
    /// source only when no explicit `csrf_token` is set.
    pub cookies: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WidgetConfig {
    pub greeting: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MountConfig {
    pub excluded_markers: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_EXCLUDED_MARKER: &str = "/admin/";

pub const DEFAULT_GREETING: &str = "Hi! 👋 I'm your AI Assistant. \
    How can I help you today? Feel free to ask about our products, \
    orders, or anything else!";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// None means the request carries no CSRF header at all.
    pub csrf_token: Option<String>,
    pub greeting: String,
    pub excluded_markers: Vec<String>,
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

/// Returns the path to `~/.sidekick/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sidekick").join("config.toml"))
}

/// Load config from `~/.sidekick/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SidekickConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SidekickConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SidekickConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SidekickConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: SidekickConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Sidekick Configuration
# All settings are optional; defaults cover anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [api]
# base_url = "http://localhost:8000"   # Chatbot backend origin, or SIDEKICK_BASE_URL
# timeout_secs = 15
# csrf_token = "..."                   # Or set SIDEKICK_CSRF_TOKEN env var
# cookies = "csrftoken=..."            # Cookie string to mine for a token, or SIDEKICK_COOKIES

# [widget]
# greeting = "Hi! How can I help you today?"

# [mount]
# excluded_markers = ["/admin/"]       # Context paths where the widget stays hidden
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
/// `cli_base_url` is from the CLI flag (None = not specified).
pub fn resolve(config: &SidekickConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SIDEKICK_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // CSRF token: explicit token → cookie string, env wins within each
    let csrf_token = resolve_csrf_token(config);

    ResolvedConfig {
        base_url,
        timeout_secs: config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        csrf_token,
        greeting: config
            .widget
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        excluded_markers: config
            .mount
            .excluded_markers
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_EXCLUDED_MARKER.to_string()]),
    }
}

/// Resolves the CSRF token: an explicit token wins over a cookie string.
///
/// Sources in order: `SIDEKICK_CSRF_TOKEN` env var, `csrf_token` in config,
/// the `csrftoken` cookie mined from `SIDEKICK_COOKIES`, then from the
/// `cookies` config value. None means "send no CSRF header".
fn resolve_csrf_token(config: &SidekickConfig) -> Option<String> {
    if let Ok(token) = std::env::var("SIDEKICK_CSRF_TOKEN")
        && !token.is_empty()
    {
        return Some(token);
    }
    if let Some(ref token) = config.api.csrf_token {
        return Some(token.clone());
    }

    let cookies = std::env::var("SIDEKICK_COOKIES")
        .ok()
        .or_else(|| config.api.cookies.clone())?;
    token_from_cookies(&cookies)
}

// ============================================================================
// Mount Condition
// ============================================================================

/// Whether the widget should run for the given host context path.
///
/// Keeps the widget out of back-office surfaces: if any excluded marker
/// occurs as a substring of the context path, the widget does not mount.
pub fn should_mount(context_path: &str, excluded_markers: &[String]) -> bool {
    !excluded_markers
        .iter()
        .any(|marker| context_path.contains(marker.as_str()))
}
