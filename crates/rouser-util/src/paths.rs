//! Default paths for rouser components
//!
//! Provides centralized path defaults that all crates can use.
//! Paths are user-writable by default (no root required):
//! - Config: `$XDG_CONFIG_HOME/rouser/config.toml` or `~/.config/rouser/config.toml`
//! - Data: `$XDG_DATA_HOME/rouser` or `~/.local/share/rouser`
//! - Logs: `$XDG_STATE_HOME/rouser` or `~/.local/state/rouser`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const ROUSER_CONFIG_ENV: &str = "ROUSER_CONFIG";

/// Environment variable for overriding the data directory
pub const ROUSER_DATA_DIR_ENV: &str = "ROUSER_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "rouser";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$ROUSER_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/rouser/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/rouser/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(ROUSER_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$ROUSER_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/rouser` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/rouser` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(ROUSER_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking ROUSER_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("data")
}

/// Get the default log directory.
///
/// Order of precedence:
/// 1. `$XDG_STATE_HOME/rouser` (if XDG_STATE_HOME is set)
/// 2. `~/.local/state/rouser` (fallback)
pub fn default_log_dir() -> PathBuf {
    if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(state_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("state")
            .join(APP_DIR);
    }

    PathBuf::from("/tmp").join(APP_DIR).join("logs")
}
