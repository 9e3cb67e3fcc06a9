use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_iso, r"^(\d{4})-(\d{2})-(\d{2})(?:[T ]\S*)?$");
re!(re_day_first, r"^(\d{1,2})[./](\d{1,2})[./](\d{4})$");
re!(re_day_first_short_year, r"^(\d{1,2})\.(\d{1,2})\.(\d{2})$");

/// Two-digit years above this resolve to 19xx, the rest to 20xx.
const TWO_DIGIT_YEAR_PIVOT: i32 = 50;

const FALLBACK_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d. %B %Y",
];

/// Normalize a bank date cell to a calendar date.
///
/// Tries, in order: ISO `YYYY-MM-DD` (optionally followed by a time),
/// `DD.MM.YYYY` / `DD/MM/YYYY`, `DD.MM.YY`, the caller's chrono format hint,
/// then a handful of generic shapes. `None` means the row is unusable.
pub fn parse_date(text: &str, format_hint: Option<&str>) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(c) = re_iso().captures(s) {
        if let Some(date) = ymd(&c[1], &c[2], &c[3]) {
            return Some(date);
        }
    }

    if let Some(c) = re_day_first().captures(s) {
        if let Some(date) = ymd(&c[3], &c[2], &c[1]) {
            return Some(date);
        }
    }

    if let Some(c) = re_day_first_short_year().captures(s) {
        let yy: i32 = c[3].parse().ok()?;
        let year = if yy > TWO_DIGIT_YEAR_PIVOT { 1900 + yy } else { 2000 + yy };
        if let Some(date) = ymd(&year.to_string(), &c[2], &c[1]) {
            return Some(date);
        }
    }

    if let Some(hint) = format_hint.filter(|h| !h.is_empty()) {
        if let Ok(date) = NaiveDate::parse_from_str(s, hint) {
            return Some(date);
        }
    }

    fallback(s)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
