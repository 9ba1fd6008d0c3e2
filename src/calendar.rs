use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_CALENDAR_DAYS: usize = 30;
/// Upper bound on how many days one calendar request may list.
pub const MAX_CALENDAR_DAYS: usize = 366;

/// A candidate meeting day as shown in the date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// Canonical sortable key, `YYYY-MM-DD`.
    pub key: String,
    /// Display form, e.g. `Mon Jan 1`.
    pub label: String,
    pub weekday: String,
    pub day: u32,
    pub month: String,
    pub is_today: bool,
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a canonical date key. Only used at the request boundary; the
/// scheduling core treats keys as opaque sortable strings.
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if t.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(t, DATE_KEY_FORMAT).ok()
}

pub fn is_today(key: &str, today: NaiveDate) -> bool {
    key == date_key(today)
}

pub fn calendar_days(today: NaiveDate, count: usize) -> Vec<CalendarDay> {
    today
        .iter_days()
        .take(count)
        .map(|d| {
            let key = date_key(d);
            CalendarDay {
                is_today: is_today(&key, today),
                label: d.format("%a %b %-d").to_string(),
                weekday: d.format("%a").to_string(),
                day: d.day(),
                month: d.format("%b").to_string(),
                key,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn days_start_today_and_are_consecutive() {
        let days = calendar_days(d(2024, 2, 27), 5);
        let keys: Vec<&str> = days.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]
        );
        assert!(days[0].is_today);
        assert!(days[1..].iter().all(|c| !c.is_today));
    }

    #[test]
    fn display_label_uses_short_names() {
        let days = calendar_days(d(2024, 1, 1), 1);
        assert_eq!(days[0].label, "Mon Jan 1");
        assert_eq!(days[0].weekday, "Mon");
        assert_eq!(days[0].month, "Jan");
        assert_eq!(days[0].day, 1);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(calendar_days(d(2024, 1, 1), 0).is_empty());
    }

    #[test]
    fn parse_date_key_requires_canonical_form() {
        assert_eq!(parse_date_key("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date_key("2024-1-5"), None);
        assert_eq!(parse_date_key("2024-02-30"), None);
        assert_eq!(parse_date_key("tomorrow"), None);
    }
}
