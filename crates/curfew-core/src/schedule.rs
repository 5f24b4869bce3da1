//! Schedule evaluation
//!
//! A group is live when both its day window and its hour window match the
//! instant. Evaluation is a pure function of the group and the time given.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use curfew_api::{DaySelection, Group, HourSelection, PolicyDocument};
use curfew_util::GroupName;

/// Whether the day window contains `weekday`
pub fn day_match(days: &DaySelection, weekday: Weekday) -> bool {
    days.matches(|d| d.matches(weekday))
}

/// Whether the hour window contains `hour` (0-23)
pub fn hour_match(hours: &HourSelection, hour: u32) -> bool {
    hours.matches(|h| h.matches(hour))
}

/// Whether `group` is live at `now`
pub fn is_live<Tz: TimeZone>(group: &Group, now: &DateTime<Tz>) -> bool {
    day_match(&group.days, now.weekday()) && hour_match(&group.hours, now.hour())
}

/// Whether the named group is live at `now`. Unknown groups are never live.
pub fn is_group_live<Tz: TimeZone>(
    document: &PolicyDocument,
    name: &GroupName,
    now: &DateTime<Tz>,
) -> bool {
    document
        .group(name)
        .is_some_and(|group| is_live(group, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use curfew_api::{DaySpec, HourSpec, Selection};

    // 2025-12-29 is a Monday
    fn monday_at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 29, hour, 0, 0).unwrap()
    }

    fn work_group() -> Group {
        Group {
            hours: Selection::only([HourSpec::Range { start: 9, end: 17 }]),
            days: Selection::only([DaySpec::new(Weekday::Mon), DaySpec::new(Weekday::Tue)]),
            domains: Default::default(),
        }
    }

    #[test]
    fn test_wildcard_group_is_always_live() {
        let group = Group::default();
        for hour in 0..24 {
            assert!(is_live(&group, &monday_at(hour)));
        }
    }

    #[test]
    fn test_range_is_half_open() {
        let group = work_group();
        assert!(!is_live(&group, &monday_at(8)));
        assert!(is_live(&group, &monday_at(9)));
        assert!(is_live(&group, &monday_at(16)));
        assert!(!is_live(&group, &monday_at(17)));
    }

    #[test]
    fn test_day_must_match() {
        let group = work_group();
        // 2025-12-31 is a Wednesday
        let wednesday = Local.with_ymd_and_hms(2025, 12, 31, 10, 0, 0).unwrap();
        assert!(!is_live(&group, &wednesday));
    }

    #[test]
    fn test_single_hour_spec() {
        let group = Group {
            hours: Selection::only([HourSpec::At(8)]),
            ..Group::default()
        };
        assert!(is_live(&group, &monday_at(8)));
        assert!(!is_live(&group, &monday_at(9)));
    }

    #[test]
    fn test_empty_selections_never_match() {
        let no_hours = Group {
            hours: Selection::none(),
            ..Group::default()
        };
        let no_days = Group {
            days: Selection::none(),
            ..Group::default()
        };
        for hour in 0..24 {
            assert!(!is_live(&no_hours, &monday_at(hour)));
            assert!(!is_live(&no_days, &monday_at(hour)));
        }
    }

    #[test]
    fn test_unknown_group_is_not_live() {
        let doc = PolicyDocument::initial();
        assert!(is_group_live(&doc, &GroupName::default_group(), &monday_at(3)));
        assert!(!is_group_live(&doc, &GroupName::new("ghost"), &monday_at(3)));
    }
}
