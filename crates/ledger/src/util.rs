//! Internal helpers for dates and text normalization.
//!
//! These utilities are **not** part of the public API surface except for
//! [`LedgerDate`], which callers use to hand in either a civil day or an
//! exact instant.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use unicode_normalization::UnicodeNormalization;

/// A point in time as the caller knows it.
///
/// Date-only inputs are expanded to start-of-day in the ledger's configured
/// reporting timezone so range queries stay well-defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerDate {
    /// A civil day, e.g. what a date picker produces.
    Day(NaiveDate),
    /// An exact instant.
    Instant(DateTime<Utc>),
}

impl From<NaiveDate> for LedgerDate {
    fn from(value: NaiveDate) -> Self {
        Self::Day(value)
    }
}

impl From<DateTime<Utc>> for LedgerDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Instant(value)
    }
}

/// Start of a civil day in `tz`, as a UTC instant.
///
/// If midnight falls into a DST gap the first valid instant of the day is
/// used instead.
pub(crate) fn day_start(tz: Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
        LocalResult::None => {
            let shifted = midnight + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&midnight),
            }
        }
    }
}

/// Upper bound of an inclusive range end.
///
/// `at` is the boundary instant; `inclusive` says whether rows exactly at the
/// boundary are inside the range. A civil day maps to an exclusive bound at
/// the start of the following day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UpperBound {
    pub at: DateTime<Utc>,
    pub inclusive: bool,
}

pub(crate) fn range_lower(tz: Tz, bound: LedgerDate) -> DateTime<Utc> {
    match bound {
        LedgerDate::Instant(t) => t,
        LedgerDate::Day(day) => day_start(tz, day),
    }
}

pub(crate) fn range_upper(tz: Tz, bound: LedgerDate) -> UpperBound {
    match bound {
        LedgerDate::Instant(t) => UpperBound {
            at: t,
            inclusive: true,
        },
        LedgerDate::Day(day) => UpperBound {
            at: day_start(tz, day + Duration::days(1)),
            inclusive: false,
        },
    }
}

/// NFC-normalized, lowercased, trimmed key for name dedup and free-text
/// search.
pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().nfc().collect::<String>().to_lowercase()
}

/// Canonical stored form of a document code: trimmed upper-case.
pub(crate) fn normalize_code(value: &str) -> String {
    value.trim().nfc().collect::<String>().to_uppercase()
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_follow_the_reporting_zone() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let start = day_start(chrono_tz::Asia::Bangkok, day);
        // UTC+7, no DST: local midnight is 17:00 UTC the previous day.
        assert_eq!(start.to_rfc3339(), "2026-03-13T17:00:00+00:00");

        let upper = range_upper(chrono_tz::Asia::Bangkok, LedgerDate::Day(day));
        assert!(!upper.inclusive);
        assert_eq!(upper.at.to_rfc3339(), "2026-03-14T17:00:00+00:00");
    }

    #[test]
    fn instant_bounds_are_inclusive() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(range_lower(Tz::UTC, LedgerDate::Instant(t)), t);
        let upper = range_upper(Tz::UTC, LedgerDate::Instant(t));
        assert!(upper.inclusive);
        assert_eq!(upper.at, t);
    }

    #[test]
    fn normalization_folds_case_and_width() {
        assert_eq!(normalize_code("  pt0007 "), "PT0007");
        assert_eq!(normalize_text("  Xưởng Gỗ "), "xưởng gỗ");
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(
            normalize_optional_text(Some(" keep ")),
            Some("keep".to_string())
        );
    }
}
