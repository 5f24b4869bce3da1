//! Wall-clock time for curfew
//!
//! Schedules are evaluated against local wall-clock time at hour
//! granularity.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `CURFEW_MOCK_TIME` environment variable can be set
//! to override the system time. This is useful for checking which groups
//! are live at a given hour without waiting for it.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-29 10:00:00`)
//!
//! Example:
//! ```bash
//! CURFEW_MOCK_TIME="2025-12-29 10:00:00" curfew --list
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "CURFEW_MOCK_TIME";

/// Format accepted by `CURFEW_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once per process.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Interpret a `CURFEW_MOCK_TIME` value as a local instant.
#[cfg_attr(not(debug_assertions), allow(dead_code))]
fn parse_mock_time(value: &str) -> Option<DateTime<Local>> {
    let Ok(naive_dt) = NaiveDateTime::parse_from_str(value.trim(), MOCK_TIME_FORMAT) else {
        tracing::warn!(
            mock_time = %value,
            expected_format = MOCK_TIME_FORMAT,
            "Invalid mock time format"
        );
        return None;
    };
    let mock_dt = Local.from_local_datetime(&naive_dt).single();
    if mock_dt.is_none() {
        tracing::warn!(
            mock_time = %value,
            "Failed to convert mock time to local timezone"
        );
    }
    mock_dt
}

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            let mock_time_str = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
            let mock_dt = parse_mock_time(&mock_time_str)?;
            let offset = mock_dt.signed_duration_since(Local::now());
            tracing::info!(
                mock_time = %mock_time_str,
                offset_secs = offset.num_seconds(),
                "Mock time enabled"
            );
            Some(offset)
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
pub fn now() -> DateTime<Local> {
    let real_now = Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Format a DateTime as a log line prefix, e.g. `[2025-12-29 10:00:00]`.
pub fn format_timestamp(dt: &DateTime<Local>) -> String {
    dt.format("[%Y-%m-%d %H:%M:%S]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_format_timestamp() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_timestamp(&dt), "[2025-12-25 14:30:45]");
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_parse_mock_time() {
        let parsed = parse_mock_time("2025-12-29 10:00:00").unwrap();
        assert_eq!(parsed, Local.with_ymd_and_hms(2025, 12, 29, 10, 0, 0).unwrap());
        assert_eq!(parsed.weekday(), chrono::Weekday::Mon);
        assert_eq!(parsed.hour(), 10);

        let padded = parse_mock_time(" 2025-12-31 23:59:59\n").unwrap();
        assert_eq!(padded.minute(), 59);
    }

    #[test]
    fn test_parse_mock_time_rejects_other_formats() {
        for value in [
            "2025-12-29",
            "10:00:00",
            "2025/12/29 10:00:00",
            "2025-12-29T10:00:00",
            "",
        ] {
            assert!(parse_mock_time(value).is_none(), "Expected '{}' to be rejected", value);
        }
    }

    #[test]
    fn test_now_advances() {
        let t1 = now();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let t2 = now();
        assert!(t2 > t1, "Time should advance forward");
    }
}
