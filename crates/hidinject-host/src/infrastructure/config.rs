//! TOML-based configuration for the hidinject tools.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Linux:    `$XDG_CONFIG_HOME/hidinject/config.toml` or `~/.config/hidinject/config.toml`
//! - Windows:  `%APPDATA%\HidInject\config.toml`
//! - macOS:    `~/Library/Application Support/HidInject/config.toml`
//!
//! The `HIDINJECT_CONFIG` environment variable, when set, names the file
//! directly and overrides the platform location.
//!
//! A missing file is not an error: every field has a default, so the tools
//! work out of the box and an older file missing newer fields still loads.
//!
//! ```toml
//! [general]
//! log_level = "info"
//!
//! [deploy]
//! startup_delay_polls = 100
//! open_terminal_hotkey = { modifiers = 5, keycode = 0x17 }   # ctrl+alt+t
//! post_hotkey_delay_polls = 100
//! heredoc_terminator = "EOL"
//! poll_interval_ms = 1
//! exit_when_drained = true
//!
//! [live]
//! escape_code = 29
//! poll_interval_ms = 10
//!
//! [transport]
//! kind = "simulated"
//! device_path = "/dev/hidg0"
//! ```

use std::path::{Path, PathBuf};

use hidinject_core::HidKeyReport;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the config file explicitly.
pub const CONFIG_ENV_VAR: &str = "HIDINJECT_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

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

    /// A value parsed but is not usable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// File-deploy mode settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployConfig {
    /// Idle polls before the hotkey, giving the host time to bind a driver.
    #[serde(default = "default_delay_polls")]
    pub startup_delay_polls: usize,
    /// Chord that opens a terminal on the target.
    #[serde(default = "default_open_terminal_hotkey")]
    pub open_terminal_hotkey: HotkeyConfig,
    /// Idle polls after the hotkey, giving the terminal time to appear.
    #[serde(default = "default_delay_polls")]
    pub post_hotkey_delay_polls: usize,
    #[serde(default = "default_heredoc_terminator")]
    pub heredoc_terminator: String,
    #[serde(default = "default_deploy_interval")]
    pub poll_interval_ms: u8,
    /// Stop once everything has been typed instead of idling until Ctrl+C.
    #[serde(default = "default_true")]
    pub exit_when_drained: bool,
}

/// Live and hotkeys mode settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveConfig {
    /// Input code that ends the session.  29 is ctrl+`]`.
    #[serde(default = "default_escape_code")]
    pub escape_code: u8,
    #[serde(default = "default_live_interval")]
    pub poll_interval_ms: u8,
}

/// Raw report bytes for a chord: modifier mask and key usage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotkeyConfig {
    pub modifiers: u8,
    pub keycode: u8,
}

impl HotkeyConfig {
    /// Validates the chord against the report format.
    pub fn to_report(self) -> Result<HidKeyReport, ConfigError> {
        HidKeyReport::from_bytes([self.modifiers, 0, self.keycode]).ok_or_else(|| {
            ConfigError::Invalid {
                field: "deploy.open_terminal_hotkey",
                reason: format!("keycode {:#04x} is not a keyboard usage", self.keycode),
            }
        })
    }
}

/// Which emulation host drives the session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Timer-driven polling; reports go to the log.
    #[default]
    Simulated,
    /// Reports are written to a HID gadget character device.
    Device,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_delay_polls() -> usize {
    100
}
fn default_open_terminal_hotkey() -> HotkeyConfig {
    // ctrl+alt+t
    HotkeyConfig {
        modifiers: 0x05,
        keycode: 0x17,
    }
}
fn default_heredoc_terminator() -> String {
    "EOL".to_string()
}
fn default_deploy_interval() -> u8 {
    1
}
fn default_live_interval() -> u8 {
    10
}
fn default_true() -> bool {
    true
}
fn default_escape_code() -> u8 {
    0x1D
}
fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            startup_delay_polls: default_delay_polls(),
            open_terminal_hotkey: default_open_terminal_hotkey(),
            post_hotkey_delay_polls: default_delay_polls(),
            heredoc_terminator: default_heredoc_terminator(),
            poll_interval_ms: default_deploy_interval(),
            exit_when_drained: default_true(),
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            escape_code: default_escape_code(),
            poll_interval_ms: default_live_interval(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            device_path: default_device_path(),
        }
    }
}

impl AppConfig {
    /// Rejects values that parse but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.deploy.open_terminal_hotkey.to_report()?;
        if self.deploy.heredoc_terminator.trim().is_empty()
            || self.deploy.heredoc_terminator.contains(char::is_whitespace)
        {
            return Err(ConfigError::Invalid {
                field: "deploy.heredoc_terminator",
                reason: "must be a single non-empty word".to_string(),
            });
        }
        if self.live.escape_code > 0x7F {
            return Err(ConfigError::Invalid {
                field: "live.escape_code",
                reason: format!("{} is not a 7-bit character code", self.live.escape_code),
            });
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the config file path: `HIDINJECT_CONFIG` first, then the
/// platform directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if neither is available.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the config from its default location, falling back to defaults
/// when no file exists.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    match config_file_path() {
        Ok(path) => load_config_from(&path),
        Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
        Err(e) => Err(e),
    }
}

/// Loads and validates the config at `path`.  A missing file yields
/// [`AppConfig::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed and
/// [`ConfigError::Invalid`] if a value is unusable.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "loading config");
            toml::from_str::<AppConfig>(&content)?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            AppConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Resolves the platform config directory for hidinject.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("HidInject"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("hidinject"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("HidInject")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
