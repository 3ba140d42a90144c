//! Date helper functions

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::i18n::{Ago, Language};

/// How a date is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `YYYY-MM-DD`
    #[default]
    Full,
    /// `MM-DD`
    Short,
    /// today, yesterday, 3 days ago...
    Relative,
}

/// Formats post dates for one site
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatter {
    language: Language,
    timezone: Option<Tz>,
}

impl DateFormatter {
    pub fn new(language: Language, timezone: Option<Tz>) -> Self {
        Self { language, timezone }
    }

    /// Current wall-clock time in the site's timezone
    pub fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }

    /// Format a date string; text that isn't a date comes back unchanged
    pub fn format(&self, date: &str, style: DateStyle) -> String {
        self.format_at(date, style, self.now())
    }

    /// Format against a fixed "now"
    pub fn format_at(&self, date: &str, style: DateStyle, now: NaiveDateTime) -> String {
        let Some(parsed) = parse_date(date) else {
            return date.to_string();
        };

        match style {
            DateStyle::Full => parsed.format("%Y-%m-%d").to_string(),
            DateStyle::Short => parsed.format("%m-%d").to_string(),
            DateStyle::Relative => self.language.ago(ago(parsed, now)),
        }
    }
}

/// Format a date string in English, relative to local time
pub fn format_date(date: &str, style: DateStyle) -> String {
    DateFormatter::default().format(date, style)
}

/// Bucket the whole-day distance between `date` and `now`
fn ago(date: NaiveDateTime, now: NaiveDateTime) -> Ago {
    let days = (now - date).num_days();
    match days {
        d if d <= 0 => Ago::Today,
        1 => Ago::Yesterday,
        d if d < 7 => Ago::Days(d),
        d if d < 30 => Ago::Weeks(d / 7),
        d if d < 365 => Ago::Months(d / 30),
        d => Ago::Years(d / 365),
    }
}

/// Calendar year of a date string
pub fn year_of(date: &str) -> Option<i32> {
    parse_date(date).map(|d| d.year())
}

/// Parse a date string in various formats
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with an offset, kept as written
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_full_and_short() {
        let f = DateFormatter::default();
        let now = at("2024-06-01");
        assert_eq!(f.format_at("2024-01-05", DateStyle::Full, now), "2024-01-05");
        assert_eq!(f.format_at("2024-01-05", DateStyle::Short, now), "01-05");
        assert_eq!(
            f.format_at("2024/01/05 10:30", DateStyle::Full, now),
            "2024-01-05"
        );
    }

    #[test]
    fn test_relative_buckets() {
        let f = DateFormatter::default();
        let now = at("2024-06-30 12:00:00");
        let rel = |d: &str| f.format_at(d, DateStyle::Relative, now);
        assert_eq!(rel("2024-06-30"), "today");
        assert_eq!(rel("2024-06-29"), "yesterday");
        assert_eq!(rel("2024-06-27"), "3 days ago");
        assert_eq!(rel("2024-06-16"), "2 weeks ago");
        assert_eq!(rel("2024-03-01"), "4 months ago");
        assert_eq!(rel("2022-01-01"), "2 years ago");
        assert_eq!(rel("2025-01-01"), "today");
    }

    #[test]
    fn test_relative_in_chinese() {
        let f = DateFormatter::new(Language::ZhCn, None);
        let now = at("2024-06-30");
        assert_eq!(f.format_at("2024-06-29", DateStyle::Relative, now), "昨天");
        assert_eq!(f.format_at("2024-06-25", DateStyle::Relative, now), "5 天前");
    }

    #[test]
    fn test_unparseable_date_is_returned() {
        assert_eq!(format_date("someday", DateStyle::Full), "someday");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(year_of("2023-12-31"), Some(2023));
        assert_eq!(year_of("2023-12-31T23:59:59+08:00"), Some(2023));
        assert_eq!(year_of("2023-12-31T08:00:00.123"), Some(2023));
        assert_eq!(year_of("not a date"), None);
    }
}
