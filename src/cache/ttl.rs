//! Content-aware cache TTL policy.
//!
//! Recently released titles have scores that churn quickly and expire fast;
//! older titles are stable and can stay cached for weeks. Pure functions, no
//! I/O, `now` is always passed in.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content younger than four months
pub const SHORT_TTL_SECONDS: u64 = 3 * 60 * 60;
/// Content younger than a year
pub const MEDIUM_TTL_SECONDS: u64 = 24 * 60 * 60;
/// Everything older
pub const LONG_TTL_SECONDS: u64 = 60 * 24 * 60 * 60;

/// Search results change slowly upstream
pub const SEARCH_TTL_SECONDS: u64 = 24 * 60 * 60;
/// Generated summaries rarely change
pub const THEME_TTL_SECONDS: u64 = 90 * 24 * 60 * 60;

fn four_months() -> Duration {
    Duration::days(4 * 30)
}

fn one_year() -> Duration {
    // 365.25 days
    Duration::seconds(31_557_600)
}

/// Metadata the score TTL is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Precise release date, e.g. `2024-05-17`
    pub release_date: Option<String>,
    /// Release year, used when no usable date exists
    pub year: Option<String>,
}

impl ReleaseInfo {
    pub fn new(release_date: Option<&str>, year: Option<&str>) -> Self {
        Self {
            release_date: release_date.map(str::to_string),
            year: year.map(str::to_string),
        }
    }

    pub fn ttl_at(&self, now: DateTime<Utc>) -> Option<u64> {
        compute_ttl(self.release_date.as_deref(), self.year.as_deref(), now)
    }
}

/// Compute the score-cache TTL in seconds, `None` meaning do not cache
///
/// A parseable release date wins; otherwise the year decides by whole
/// calendar years; with neither the value is not cached.
pub fn compute_ttl(release_date: Option<&str>, year: Option<&str>, now: DateTime<Utc>) -> Option<u64> {
    if let Some(released) = release_date.and_then(parse_release_date) {
        let age = now - released;
        let ttl = if age < four_months() {
            SHORT_TTL_SECONDS
        } else if age < one_year() {
            MEDIUM_TTL_SECONDS
        } else {
            LONG_TTL_SECONDS
        };
        return Some(ttl);
    }

    let year = year.and_then(parse_year)?;
    let age = now.year().checked_sub(year)?;
    Some(match age {
        a if a < 1 => SHORT_TTL_SECONDS,
        a if a < 2 => MEDIUM_TTL_SECONDS,
        _ => LONG_TTL_SECONDS,
    })
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]` (UTC), `YYYY-MM-DD`,
/// `YYYY-MM` and `YYYY` (the latter three at the start of the period, UTC)
pub fn parse_release_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_partial_date(value))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `YYYY` or `YYYY-MM`, as the first day of that year or month
fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    let (year, month) = match value.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (value, None),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let month = match month {
        Some(m) if m.len() == 2 && m.bytes().all(|b| b.is_ascii_digit()) => m.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

/// Leading-integer parse: `"2024"` and `"2024 (US)"` both give 2024
pub fn parse_year(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let year: i32 = rest[..end].parse().ok()?;
    Some(if negative { -year } else { year })
}
