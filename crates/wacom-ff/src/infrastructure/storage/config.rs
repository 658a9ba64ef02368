//! TOML configuration file for the daemon.
//!
//! Read from `$XDG_CONFIG_HOME/wacom-ff/config.toml`, falling back to
//! `~/.config/wacom-ff/config.toml`:
//!
//! ```toml
//! [service]
//! device = "Wacom Intuos Pro M Pen stylus"
//! every = 2
//! always_poll = false
//!
//! [logging]
//! level = "info"
//! file = "/home/me/.local/share/wacom-ff/service.log"
//!
//! [commands]
//! timeout_secs = 10
//! xdotool = "xdotool"
//! xrandr = "xrandr"
//! xsetwacom = "xsetwacom"
//! ```
//!
//! Every section and every field is optional.  Command-line flags override
//! whatever is set here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine the config directory")]
    NoConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub commands: CommandsConfig,
}

/// Which device to follow focus for, and how often.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Input device name as listed by `xsetwacom list devices`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Poll interval in seconds; `0` disables the internal timer.
    pub every: u64,
    /// Reload the monitor layout on every poll.
    pub always_poll: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` level directive, e.g. `"info"` or `"wacom_ff=debug"`.
    pub level: String,
    /// Log file; stderr when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// External tools and the timeout applied to each invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommandsConfig {
    /// Seconds before an external tool is killed; `0` waits indefinitely.
    pub timeout_secs: u64,
    pub xdotool: String,
    pub xrandr: String,
    pub xsetwacom: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            xdotool: "xdotool".to_string(),
            xrandr: "xrandr".to_string(),
            xsetwacom: "xsetwacom".to_string(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Directory holding `config.toml`.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] when neither `XDG_CONFIG_HOME` nor
/// `HOME` is set.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    resolve_config_dir(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
    .ok_or(ConfigError::NoConfigDir)
}

/// Full path to the default config file.
///
/// # Errors
///
/// See [`config_dir`].
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config file from its default location, returning
/// `AppConfig::default()` if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `path`, returning `AppConfig::default()` if it does not exist.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `XDG_CONFIG_HOME` wins over `HOME/.config`.  Empty values are ignored.
fn resolve_config_dir(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            home.filter(|v| !v.is_empty())
                .map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(base.join("wacom-ff"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
