//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Hosts file roles and the blackhole address
    #[serde(default)]
    pub hosts: RawHostsConfig,

    /// Policy document location
    #[serde(default)]
    pub store: RawStoreConfig,

    /// Scheduled-run settings
    #[serde(default)]
    pub cron: RawCronConfig,
}

/// Hosts file settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawHostsConfig {
    /// Live override file (default: /etc/hosts)
    pub file: Option<PathBuf>,

    /// First-run backup (default: /etc/hosts.original)
    pub original: Option<PathBuf>,

    /// Editable base content (default: /etc/hosts.template)
    pub template: Option<PathBuf>,

    /// Address blocked domains resolve to (default: 127.0.0.250)
    pub blackhole: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStoreConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCronConfig {
    /// File the crontab line appends output to
    pub log_file: Option<PathBuf>,
}
