//! Concrete hour and day specs

use chrono::Weekday;
use curfew_util::{CurfewError, CurfewResult};
use std::fmt;
use std::str::FromStr;

use crate::Selection;

/// Hours a group is live during
pub type HourSelection = Selection<HourSpec>;

/// Days a group is live on
pub type DaySelection = Selection<DaySpec>;

/// A concrete hour rule on a 24 hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourSpec {
    /// A single hour, e.g. `8`
    At(u8),
    /// A half-open range, e.g. `9-17` covers 9:00 through 16:59
    Range { start: u8, end: u8 },
}

impl HourSpec {
    /// Whether `hour` (0-23) falls under this spec.
    ///
    /// The range upper bound is exclusive: `9-17` does not match hour 17.
    /// A range whose start is not below its end matches nothing.
    pub fn matches(&self, hour: u32) -> bool {
        match *self {
            HourSpec::At(h) => u32::from(h) == hour,
            HourSpec::Range { start, end } => u32::from(start) <= hour && hour < u32::from(end),
        }
    }
}

fn parse_hour(s: &str, spec: &str) -> CurfewResult<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CurfewError::validation(format!(
            "Invalid hour spec '{}': expected an hour (e.g. 8), a range (e.g. 9-17) or '*'",
            spec
        )));
    }
    let hour: u8 = s
        .parse()
        .map_err(|_| CurfewError::validation(format!("Invalid hour in '{}'", spec)))?;
    if hour >= 24 {
        return Err(CurfewError::validation(format!(
            "Invalid hour spec '{}': hours must be 0-23",
            spec
        )));
    }
    Ok(hour)
}

impl FromStr for HourSpec {
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        match spec.split_once('-') {
            Some((start, end)) => Ok(HourSpec::Range {
                start: parse_hour(start, spec)?,
                end: parse_hour(end, spec)?,
            }),
            None => parse_hour(spec, spec).map(HourSpec::At),
        }
    }
}

impl fmt::Display for HourSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HourSpec::At(h) => write!(f, "{}", h),
            HourSpec::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}

/// A concrete day rule: one weekday, written by its full name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpec(Weekday);

/// Weekdays in Monday=0 .. Sunday=6 order
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday, as stored in the policy document
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl DaySpec {
    pub fn new(day: Weekday) -> Self {
        Self(day)
    }

    pub fn weekday(&self) -> Weekday {
        self.0
    }

    pub fn matches(&self, day: Weekday) -> bool {
        self.0 == day
    }
}

impl From<Weekday> for DaySpec {
    fn from(day: Weekday) -> Self {
        Self(day)
    }
}

impl FromStr for DaySpec {
    type Err = CurfewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WEEKDAYS
            .iter()
            .find(|day| weekday_name(**day).eq_ignore_ascii_case(s))
            .map(|day| DaySpec(*day))
            .ok_or_else(|| {
                CurfewError::validation(format!(
                    "Invalid day spec '{}': expected a full day name (e.g. Monday) or '*'",
                    s
                ))
            })
    }
}

impl fmt::Display for DaySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(weekday_name(self.0))
    }
}
