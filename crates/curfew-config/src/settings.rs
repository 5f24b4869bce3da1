//! Validated settings

use crate::schema::{RawConfig, RawCronConfig, RawHostsConfig, RawStoreConfig};
use crate::validation::parse_blackhole;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Validated settings, threaded explicitly into each component
#[derive(Debug, Clone)]
pub struct Settings {
    pub hosts: HostsSettings,

    /// Policy document location
    pub store_path: PathBuf,

    /// File the crontab line appends to
    pub log_file: PathBuf,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            hosts: HostsSettings::from_raw(raw.hosts),
            store_path: store_path_from_raw(raw.store),
            log_file: log_file_from_raw(raw.cron),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hosts: HostsSettings::default(),
            store_path: curfew_util::default_store_path(),
            log_file: curfew_util::default_log_file(),
        }
    }
}

/// The three hosts file roles and the blackhole address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostsSettings {
    /// Live override file, rewritten on every update
    pub live: PathBuf,
    /// Backup of the live file taken on first run, never rewritten
    pub original: PathBuf,
    /// Editable base content, read on every update
    pub template: PathBuf,
    pub blackhole: IpAddr,
}

impl HostsSettings {
    fn from_raw(raw: RawHostsConfig) -> Self {
        let defaults = Self::default();
        Self {
            live: raw.file.unwrap_or(defaults.live),
            original: raw.original.unwrap_or(defaults.original),
            template: raw.template.unwrap_or(defaults.template),
            blackhole: raw
                .blackhole
                .and_then(|b| parse_blackhole(&b).ok())
                .unwrap_or(defaults.blackhole),
        }
    }
}

impl Default for HostsSettings {
    fn default() -> Self {
        Self {
            live: PathBuf::from(curfew_util::DEFAULT_HOSTS_FILE),
            original: PathBuf::from(curfew_util::DEFAULT_HOSTS_ORIGINAL),
            template: PathBuf::from(curfew_util::DEFAULT_HOSTS_TEMPLATE),
            blackhole: default_blackhole(),
        }
    }
}

fn default_blackhole() -> IpAddr {
    curfew_util::DEFAULT_BLACKHOLE
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 250)))
}

fn store_path_from_raw(raw: RawStoreConfig) -> PathBuf {
    raw.path.unwrap_or_else(curfew_util::default_store_path)
}

fn log_file_from_raw(raw: RawCronConfig) -> PathBuf {
    raw.log_file.unwrap_or_else(curfew_util::default_log_file)
}
