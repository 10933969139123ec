//! Settlement period windows and the calendar arithmetic they rely on.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One settlement window: midnight of the first day through the last second
/// of the last day, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Period {
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: day_start(start),
            end: day_end(end),
        }
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start_date(), self.end_date())
    }
}

pub(crate) fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap()
}

pub(crate) fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).unwrap()
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// Builds a date from a possibly-too-large day anchor, clamping day 29..31
/// down to the month's actual length.
pub(crate) fn clamped_ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Shifts a (year, month) pair by a signed number of months.
pub(crate) fn shift_month_index(year: i32, month: u32, months: i32) -> (i32, u32) {
    let mut year = year;
    let mut month = month as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    (year, month as u32)
}
