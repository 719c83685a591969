//! Delivery day selection and request windows.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// The calendar day a dashboard view is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryDay(NaiveDate);

impl DeliveryDay {
    /// Creates a delivery day from a date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns today's date in the machine's local time zone.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Parses a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid date.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the previous day.
    #[must_use]
    pub fn prev(&self) -> Self {
        Self(self.0.pred_opt().unwrap_or(self.0))
    }

    /// Returns the following day.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }

    /// Returns the day `days` after this one (negative goes back).
    #[must_use]
    pub fn offset(&self, days: i64) -> Self {
        self.0
            .checked_add_signed(TimeDelta::days(days))
            .map_or(*self, Self)
    }

    /// Returns `[00:00Z, next day 00:00Z)` for this date.
    #[must_use]
    pub fn utc_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.from_utc_datetime(&self.0.and_time(NaiveTime::MIN));
        (start, start + TimeDelta::days(1))
    }

    /// Returns `[local midnight, next local midnight)` in `tz`, as UTC instants.
    ///
    /// Returns `None` if midnight does not exist in `tz` on either boundary.
    #[must_use]
    pub fn local_window<Tz: TimeZone>(&self, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = tz
            .from_local_datetime(&self.0.and_time(NaiveTime::MIN))
            .earliest()?;
        let end = tz
            .from_local_datetime(&self.next().0.and_time(NaiveTime::MIN))
            .earliest()?;
        Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }

    /// Returns true if `instant` falls on this calendar day in `tz`.
    #[must_use]
    pub fn contains_local<Tz: TimeZone>(&self, instant: DateTime<Utc>, tz: &Tz) -> bool {
        instant.with_timezone(tz).date_naive() == self.0
    }

    /// Returns the `dd.MM.yyyy` label used in panel headers.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}.{:02}.{}", self.0.day(), self.0.month(), self.0.year())
    }
}

impl From<NaiveDate> for DeliveryDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for DeliveryDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Formats an instant as the hour-granular `YYYYMMDDHH00` UTC form.
///
/// Minutes and seconds are dropped.
#[must_use]
pub fn entsoe_period(instant: DateTime<Utc>) -> String {
    format!(
        "{:04}{:02}{:02}{:02}00",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DeliveryDay {
        DeliveryDay::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_prev_next_cross_month() {
        assert_eq!(day(2024, 3, 1).prev(), day(2024, 2, 29));
        assert_eq!(day(2024, 12, 31).next(), day(2025, 1, 1));
        assert_eq!(day(2024, 3, 1).offset(-2), day(2024, 2, 28));
    }

    #[test]
    fn test_utc_window() {
        let (start, end) = day(2024, 3, 1).utc_window();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_local_window_fixed_offset() {
        let cet = chrono::FixedOffset::east_opt(3600).unwrap();
        let (start, end) = day(2024, 3, 1).local_window(&cet).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_contains_local() {
        let cet = chrono::FixedOffset::east_opt(3600).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 2, 29, 23, 30, 0).unwrap();
        assert!(day(2024, 3, 1).contains_local(late, &cet));
        assert!(!day(2024, 3, 1).contains_local(late, &Utc));
    }

    #[test]
    fn test_entsoe_period() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 7, 45, 10).unwrap();
        assert_eq!(entsoe_period(instant), "202403010700");
    }

    #[test]
    fn test_parse_and_label() {
        let parsed = DeliveryDay::parse("2024-03-01").unwrap();
        assert_eq!(parsed.label(), "01.03.2024");
        assert_eq!(parsed.to_string(), "2024-03-01");
        assert!(DeliveryDay::parse("01.03.2024").is_err());
    }
}
