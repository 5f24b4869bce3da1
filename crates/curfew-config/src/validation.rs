//! Configuration validation

use crate::schema::RawConfig;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid blackhole address '{value}': {message}")]
    InvalidBlackhole { value: String, message: String },

    #[error("Empty path for {0}")]
    EmptyPath(&'static str),

    #[error("{first} and {second} must be different files: {}", path.display())]
    SharedPath {
        first: &'static str,
        second: &'static str,
        path: PathBuf,
    },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(blackhole) = &config.hosts.blackhole
        && let Err(e) = parse_blackhole(blackhole)
    {
        errors.push(ValidationError::InvalidBlackhole {
            value: blackhole.clone(),
            message: e,
        });
    }

    let roles = [
        ("hosts.file", config.hosts.file.as_deref()),
        ("hosts.original", config.hosts.original.as_deref()),
        ("hosts.template", config.hosts.template.as_deref()),
        ("store.path", config.store.path.as_deref()),
        ("cron.log_file", config.cron.log_file.as_deref()),
    ];
    for (role, path) in roles {
        if path.is_some_and(|p| p.as_os_str().is_empty()) {
            errors.push(ValidationError::EmptyPath(role));
        }
    }

    errors.extend(validate_hosts_roles(
        config.hosts.file.as_deref(),
        config.hosts.original.as_deref(),
        config.hosts.template.as_deref(),
    ));

    errors
}

/// The live, original and template files must be three different paths.
fn validate_hosts_roles(
    live: Option<&Path>,
    original: Option<&Path>,
    template: Option<&Path>,
) -> Vec<ValidationError> {
    let live = live.unwrap_or(Path::new(curfew_util::DEFAULT_HOSTS_FILE));
    let original = original.unwrap_or(Path::new(curfew_util::DEFAULT_HOSTS_ORIGINAL));
    let template = template.unwrap_or(Path::new(curfew_util::DEFAULT_HOSTS_TEMPLATE));

    let pairs = [
        ("hosts.file", live, "hosts.original", original),
        ("hosts.file", live, "hosts.template", template),
        ("hosts.original", original, "hosts.template", template),
    ];

    pairs
        .into_iter()
        .filter(|(_, a, _, b)| a == b)
        .map(|(first, path, second, _)| ValidationError::SharedPath {
            first,
            second,
            path: path.to_path_buf(),
        })
        .collect()
}

/// Parse the blackhole address
pub fn parse_blackhole(s: &str) -> Result<IpAddr, String> {
    s.trim()
        .parse::<IpAddr>()
        .map_err(|e| format!("expected a numeric IP address ({})", e))
}
