//! Rolling frequency windows used to gate new occurrences.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::event_log::EventLog;
use crate::period::{clamped_ymd, day_start, shift_month_index};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
    Hour,
    Day,
    Month,
    Year,
}

impl fmt::Display for WindowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WindowUnit::Hour => "Hour",
            WindowUnit::Day => "Day",
            WindowUnit::Month => "Month",
            WindowUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

/// Caps how many occurrences may be recorded inside a rolling window.
///
/// The window is anchored to "now": it opens at the start of the current
/// unit boundary stepped back `window_span - 1` whole units, and closes at
/// the present instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyLimit {
    pub window_unit: WindowUnit,
    pub window_span: u32,
    pub max_count: u32,
}

impl FrequencyLimit {
    pub fn new(window_unit: WindowUnit, window_span: u32, max_count: u32) -> Self {
        Self {
            window_unit,
            window_span,
            max_count,
        }
    }

    /// Opening instant of the window that closes at `now`.
    pub fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        let back = self.window_span.max(1) - 1;
        match self.window_unit {
            WindowUnit::Hour => {
                let hour_start = now.date().and_hms_opt(now.hour(), 0, 0).unwrap();
                hour_start - Duration::hours(back as i64)
            }
            WindowUnit::Day => day_start(now.date() - Duration::days(back as i64)),
            WindowUnit::Month => {
                let (year, month) = shift_month_index(now.year(), now.month(), -(back as i32));
                day_start(clamped_ymd(year, month, 1))
            }
            WindowUnit::Year => day_start(clamped_ymd(now.year() - back as i32, 1, 1)),
        }
    }

    /// Number of logged occurrences inside `[window_start, now]`.
    pub fn window_count(&self, log: &EventLog, now: NaiveDateTime) -> u32 {
        let start = self.window_start(now);
        log.iter()
            .filter(|instant| **instant >= start && **instant <= now)
            .count() as u32
    }

    pub fn can_increment(&self, log: &EventLog, now: NaiveDateTime) -> bool {
        self.window_count(log, now) < self.max_count
    }

    pub fn remaining(&self, log: &EventLog, now: NaiveDateTime) -> u32 {
        self.max_count.saturating_sub(self.window_count(log, now))
    }

    pub fn label(&self) -> String {
        let span = self.window_span.max(1);
        let window = if span == 1 {
            format!("{}", self.window_unit).to_lowercase()
        } else {
            format!("{} {}s", span, self.window_unit).to_lowercase()
        };
        format!("at most {} per {}", self.max_count, window)
    }
}

impl fmt::Display for FrequencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
