//! Configuration loading and data folder resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the reference data folder
pub const DATA_DIR_ENV: &str = "SYMBTR_DATA_DIR";

/// Usul slugs whose external-source attribute is not stored upstream
pub const DEFAULT_UNLISTED_USUL_SLUGS: [&str; 8] = [
    "12212212", "22222221", "223", "232223", "262", "3223323", "3334", "14_4",
];

/// TOML configuration file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding makam.json, form.json and usul.json
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Folder holding pre-fetched metadata records (`<mbid>.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Validation section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Emit measure-start warnings as log lines (does not affect validity)
    #[serde(default = "default_print_warnings")]
    pub print_warnings: bool,

    /// Usul slugs skipped by the external-source name check
    #[serde(default = "default_unlisted_usul_slugs")]
    pub unlisted_usul_slugs: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            print_warnings: default_print_warnings(),
            unlisted_usul_slugs: default_unlisted_usul_slugs(),
        }
    }
}

fn default_print_warnings() -> bool {
    true
}

fn default_unlisted_usul_slugs() -> Vec<String> {
    DEFAULT_UNLISTED_USUL_SLUGS.iter().map(|s| s.to_string()).collect()
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// This file was missing, defaults were used
    Defaults(PathBuf),
}

impl ConfigOrigin {
    /// Log where the configuration came from
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
            ConfigOrigin::Defaults(path) => {
                warn!("Config file not found: {}, using defaults", path.display())
            }
        }
    }
}

/// Load the TOML configuration without logging
///
/// Used before the tracing subscriber exists; the caller logs the origin
/// once logging is set up.
pub fn load_toml_config_with_origin(path: &Path) -> Result<(TomlConfig, ConfigOrigin)> {
    if !path.exists() {
        return Ok((TomlConfig::default(), ConfigOrigin::Defaults(path.to_path_buf())));
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok((config, ConfigOrigin::File(path.to_path_buf())))
}

/// Load the TOML configuration
///
/// A missing file is not an error: a warning is logged and defaults are used.
/// A file that exists but does not parse is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let (config, origin) = load_toml_config_with_origin(path)?;
    origin.log();
    Ok(config)
}

/// Write configuration as TOML, creating parent folders when missing
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, content)?;
    Ok(())
}

/// Default configuration file path for the platform
///
/// `<config dir>/symbtr/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("symbtr").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.data_dir {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("symbtr").join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
