//! Utility functions for the backoffice console

use chrono::{DateTime, Datelike, Days, NaiveDateTime, TimeZone};

/// Whether two instants fall on the same calendar date in `reference`'s zone
#[must_use]
pub fn same_calendar_day<Tz: TimeZone>(instant: &DateTime<Tz>, reference: &DateTime<Tz>) -> bool {
    instant.date_naive() == reference.date_naive()
}

/// Midnight at the start of `now`'s week
///
/// The week starts on Sunday: the result is `now`'s date moved back by the
/// weekday's days-from-Sunday count, at 00:00 local to `now`'s zone.
#[must_use]
pub fn start_of_week<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDateTime {
    let days_back = u64::from(now.weekday().num_days_from_sunday());
    let date = now
        .date_naive()
        .checked_sub_days(Days::new(days_back))
        .unwrap_or_else(|| now.date_naive());
    date.and_time(chrono::NaiveTime::MIN)
}

/// Midnight on the first calendar day of `now`'s month
#[must_use]
pub fn start_of_month<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDateTime {
    let date = now
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive());
    date.and_time(chrono::NaiveTime::MIN)
}

/// Shorten text to a table-cell preview, appending an ellipsis when cut
#[must_use]
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_same_calendar_day() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 15, 0, 5, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 15, 23, 55, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 3, 16, 0, 5, 0).unwrap();

        assert!(same_calendar_day(&morning, &evening));
        assert!(!same_calendar_day(&morning, &next_day));
    }

    #[rstest]
    // 2024-03-15 is a Friday; the week began on Sunday 2024-03-10.
    #[case(2024, 3, 15, "2024-03-10")]
    // A Sunday is its own week start.
    #[case(2024, 3, 10, "2024-03-10")]
    // A Saturday reaches back six days.
    #[case(2024, 3, 9, "2024-03-03")]
    fn test_start_of_week(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] expected: &str,
    ) {
        let now = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        let start = start_of_week(&now);
        assert_eq!(start.format("%Y-%m-%d %H:%M:%S").to_string(), format!("{expected} 00:00:00"));
    }

    #[test]
    fn test_start_of_week_crosses_month_boundary() {
        // 2024-05-01 is a Wednesday; the week began on Sunday 2024-04-28.
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let start = start_of_week(&now);
        assert_eq!(start.format("%Y-%m-%d").to_string(), "2024-04-28");
    }

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 14, 25, 30).unwrap();
        let start = start_of_month(&now);
        assert_eq!(start.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 00:00:00");
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 20), "short");
        assert_eq!(truncate_preview("a longer description here", 8), "a longer...");
        assert_eq!(truncate_preview("", 5), "");
        // Multi-byte characters count as single characters.
        assert_eq!(truncate_preview("日本語のテキスト", 3), "日本語...");
    }
}
