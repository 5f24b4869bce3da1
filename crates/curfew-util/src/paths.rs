//! Default paths for curfew components
//!
//! Provides centralized path defaults that all crates can use:
//! - Hosts file roles: `/etc/hosts`, `/etc/hosts.original`, `/etc/hosts.template`
//! - Config: `$XDG_CONFIG_HOME/curfew/config.toml` or `~/.config/curfew/config.toml`
//! - Data: `$XDG_DATA_HOME/curfew` or `~/.local/share/curfew`
//! - Logs: `$XDG_STATE_HOME/curfew` or `~/.local/state/curfew`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const CURFEW_CONFIG_ENV: &str = "CURFEW_CONFIG";

/// Environment variable for overriding the data directory
pub const CURFEW_DATA_DIR_ENV: &str = "CURFEW_DATA_DIR";

/// Live name-resolution override file
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";

/// First-run backup of the live file
pub const DEFAULT_HOSTS_ORIGINAL: &str = "/etc/hosts.original";

/// User-editable base that regeneration starts from
pub const DEFAULT_HOSTS_TEMPLATE: &str = "/etc/hosts.template";

/// Unreachable address blocked domains resolve to
pub const DEFAULT_BLACKHOLE: &str = "127.0.0.250";

/// Policy document filename within the data directory
const STORE_FILENAME: &str = "curfew.json";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Cron log filename within the log directory
const LOG_FILENAME: &str = "curfew.log";

/// Application subdirectory name
const APP_DIR: &str = "curfew";

/// Config file named by `$CURFEW_CONFIG`, if set.
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CURFEW_CONFIG_ENV).map(PathBuf::from)
}

/// Default config path, ignoring `$CURFEW_CONFIG`.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/curfew/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/curfew/config.toml` (fallback)
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$CURFEW_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/curfew` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/curfew` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(CURFEW_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking CURFEW_DATA_DIR env var.
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

    // Last resort
    PathBuf::from("/var/lib").join(APP_DIR)
}

/// Default location of the policy document
pub fn default_store_path() -> PathBuf {
    default_data_dir().join(STORE_FILENAME)
}

/// Get the default log directory.
///
/// Order of precedence:
/// 1. `$XDG_STATE_HOME/curfew` (if XDG_STATE_HOME is set)
/// 2. `~/.local/state/curfew` (fallback)
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

    PathBuf::from("/var/log").join(APP_DIR)
}

/// Log file the crontab line appends to
pub fn default_log_file() -> PathBuf {
    default_log_dir().join(LOG_FILENAME)
}
