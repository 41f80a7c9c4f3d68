use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{
    format_description::FormatItem,
    macros::format_description,
    Date,
    Month::{self, December, January},
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) fn parse_ymd(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, YMD_FMT)
}

/// Canonical `YYYY-MM-DD` name of a calendar day, used as the bucket key of
/// the task store.
///
/// The key is built from the date's own year, month, and day fields.  Dates
/// handed to this type come from the local clock, so a key always names the
/// user's local day; converting through UTC first would move tasks across
/// day boundaries for anyone not at UTC+0.
///
/// Keys of years 0 through 9999 sort lexicographically in chronological
/// order.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct DateKey(String);

impl DateKey {
    #[cfg(test)]
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        DateKey(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }
}

impl FromStr for DateKey {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<DateKey, Self::Err> {
        parse_ymd(s).map(DateKey::from)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A month of a specific year, i.e., what the calendar pane displays
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) fn new(year: i32, month: Month) -> YearMonth {
        YearMonth { year, month }
    }

    pub(crate) fn of(date: Date) -> YearMonth {
        YearMonth::new(date.year(), date.month())
    }

    /// Returns `None` if the month lies outside the range of representable
    /// dates
    pub(crate) fn first_day(self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }

    pub(crate) fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        YearMonth::of(date) == self
    }

    /// Move `delta` months forwards (or backwards, if negative), rolling over
    /// year boundaries
    pub(crate) fn offset(self, delta: i32) -> YearMonth {
        let mut ym = self;
        for _ in 0..delta.unsigned_abs() {
            ym = if delta > 0 { ym.next() } else { ym.previous() };
        }
        ym
    }

    fn next(self) -> YearMonth {
        match self.month {
            December => YearMonth::new(self.year + 1, January),
            m => YearMonth::new(self.year, m.next()),
        }
    }

    fn previous(self) -> YearMonth {
        match self.month {
            January => YearMonth::new(self.year - 1, December),
            m => YearMonth::new(self.year, m.previous()),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

/// Number of days in the given month, found as the day before the first of
/// the following month
pub(crate) fn days_in_month(year: i32, month: Month) -> u8 {
    YearMonth::new(year, month)
        .offset(1)
        .first_day()
        .and_then(Date::previous_day)
        .map_or_else(|| month.length(year), Date::day)
}

/// Label for the selected day, e.g., "Friday, Mar 15"
pub(crate) fn day_label(date: Date) -> String {
    let month = date.month().to_string().chars().take(3).collect::<String>();
    format!("{}, {} {}", date.weekday(), month, date.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_date_key_zero_padded() {
        assert_eq!(DateKey::from(date!(2024 - 03 - 05)).as_str(), "2024-03-05");
        assert_eq!(DateKey::from(date!(987 - 11 - 25)).as_str(), "0987-11-25");
    }

    #[test]
    fn test_date_key_stable() {
        let d = date!(2024 - 12 - 31);
        assert_eq!(DateKey::from(d), DateKey::from(d));
        assert_eq!(
            "2024-12-31".parse::<DateKey>().unwrap(),
            DateKey::from(date!(2024 - 12 - 31))
        );
    }

    #[test]
    fn test_date_key_order_is_chronological() {
        let mut date = date!(2023 - 12 - 25);
        let mut prev = DateKey::from(date);
        for _ in 0..800 {
            date = date.next_day().unwrap();
            let key = DateKey::from(date);
            assert!(prev < key, "{prev} should sort before {key}");
            prev = key;
        }
    }

    #[test]
    fn test_date_key_rejects_garbage() {
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, Month::February), 29);
        assert_eq!(days_in_month(2023, Month::February), 28);
        assert_eq!(days_in_month(1900, Month::February), 28);
        assert_eq!(days_in_month(2000, Month::February), 29);
        assert_eq!(days_in_month(2024, Month::April), 30);
        assert_eq!(days_in_month(2024, December), 31);
        assert_eq!(days_in_month(2024, January), 31);
        // The following month is past the last representable date:
        assert_eq!(days_in_month(9999, December), 31);
    }

    #[test]
    fn test_offset_across_years() {
        let dec = YearMonth::new(2024, December);
        assert_eq!(dec.offset(1), YearMonth::new(2025, January));
        assert_eq!(
            YearMonth::new(2025, January).offset(-1),
            YearMonth::new(2024, December)
        );
        assert_eq!(dec.offset(14), YearMonth::new(2026, Month::February));
        assert_eq!(dec.offset(0), dec);
    }

    #[test]
    fn test_year_month_display() {
        assert_eq!(YearMonth::new(2024, Month::March).to_string(), "March 2024");
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label(date!(2024 - 03 - 15)), "Friday, Mar 15");
        assert_eq!(day_label(date!(2025 - 01 - 01)), "Wednesday, Jan 1");
    }
}
