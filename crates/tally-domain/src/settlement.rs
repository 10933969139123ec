//! Settlement period definitions and the period derivation engine.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::period::{clamped_ymd, shift_month_index, Period};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Month,
    Year,
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodUnit::Day => "Day",
            PeriodUnit::Month => "Month",
            PeriodUnit::Year => "Year",
        };
        f.write_str(label)
    }
}

/// Defines how time is sliced into recurring settlement windows.
///
/// `start_day`/`end_day` are 1-based day-of-month anchors, only meaningful for
/// month and year units; values past a month's length clamp to its last day.
/// `end_month_offset` pushes the end anchor into a later month than the span
/// alone would reach (0 keeps it in the span's final month).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPeriod {
    pub unit: PeriodUnit,
    pub span: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month_offset: Option<u32>,
}

impl SettlementPeriod {
    pub fn daily(span: u32) -> Self {
        Self {
            unit: PeriodUnit::Day,
            span,
            start_day: None,
            end_day: None,
            end_month_offset: None,
        }
    }

    pub fn monthly(span: u32, start_day: u32, end_day: u32, end_month_offset: u32) -> Self {
        Self {
            unit: PeriodUnit::Month,
            span,
            start_day: Some(start_day),
            end_day: Some(end_day),
            end_month_offset: Some(end_month_offset),
        }
    }

    pub fn yearly(span: u32, start_day: u32, end_day: u32) -> Self {
        Self {
            unit: PeriodUnit::Year,
            span,
            start_day: Some(start_day),
            end_day: Some(end_day),
            end_month_offset: None,
        }
    }

    /// Returns the settlement window containing `now`.
    pub fn current_period(&self, now: NaiveDateTime) -> Period {
        self.period_starting(self.start_anchor_for(now.date()))
    }

    /// Enumerates every settlement window from the one containing `earliest`
    /// up to and including the one whose start has been reached by `now`.
    ///
    /// Ends are recomputed fresh for every window so variable month lengths
    /// are absorbed instead of accumulating drift. Each advance strictly
    /// increases the window start, so the walk always terminates.
    pub fn periods_since(&self, earliest: NaiveDateTime, now: NaiveDateTime) -> Vec<Period> {
        let mut start = self.start_anchor_for(earliest.date());
        let mut periods = vec![self.period_starting(start)];
        loop {
            let next = self.advance_start(start);
            if next > now.date() {
                break;
            }
            start = next;
            periods.push(self.period_starting(start));
        }
        periods
    }

    pub fn label(&self) -> String {
        match (self.step(), self.unit) {
            (1, PeriodUnit::Day) => "Daily".into(),
            (1, PeriodUnit::Month) => "Monthly".into(),
            (1, PeriodUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}s", n, unit),
        }
    }

    /// Span with the `span >= 1` invariant enforced, guaranteeing forward
    /// progress in `periods_since`.
    fn step(&self) -> u32 {
        self.span.max(1)
    }

    fn start_day_anchor(&self) -> u32 {
        self.start_day.unwrap_or(1).clamp(1, 31)
    }

    fn end_day_anchor(&self) -> u32 {
        self.end_day.unwrap_or(31).clamp(1, 31)
    }

    /// Applies the per-unit start-anchoring rule to a reference date.
    fn start_anchor_for(&self, date: NaiveDate) -> NaiveDate {
        match self.unit {
            PeriodUnit::Day => date,
            PeriodUnit::Month => {
                let start_day = self.start_day_anchor();
                let (mut year, mut month) = (date.year(), date.month());
                // A reference before this month's anchor belongs to the
                // window opened in the previous month.
                if date.day() < start_day {
                    (year, month) = shift_month_index(year, month, -1);
                }
                clamped_ymd(year, month, start_day)
            }
            PeriodUnit::Year => {
                let start_day = self.start_day_anchor();
                let anchor = clamped_ymd(date.year(), 1, start_day);
                if date < anchor {
                    clamped_ymd(date.year() - 1, 1, start_day)
                } else {
                    anchor
                }
            }
        }
    }

    /// Materializes the window opening on `start`, deriving the end anchor
    /// from the unit, span, and optional end-month offset.
    fn period_starting(&self, start: NaiveDate) -> Period {
        let span = self.step();
        match self.unit {
            PeriodUnit::Day => Period::from_dates(start, start + Duration::days(span as i64 - 1)),
            PeriodUnit::Month => {
                let offset = span as i32 - 1 + self.end_month_offset.unwrap_or(0) as i32;
                let (end_year, end_month) = shift_month_index(start.year(), start.month(), offset);
                Period::from_dates(start, clamped_ymd(end_year, end_month, self.end_day_anchor()))
            }
            PeriodUnit::Year => Period::from_dates(
                start,
                clamped_ymd(start.year() + span as i32 - 1, 12, self.end_day_anchor()),
            ),
        }
    }

    /// Start of the window following the one opening on `start`. Re-clamps
    /// the configured day anchor against the target month, so an anchor of 31
    /// lands on Feb 28 and back on Mar 31.
    fn advance_start(&self, start: NaiveDate) -> NaiveDate {
        let span = self.step();
        match self.unit {
            PeriodUnit::Day => start + Duration::days(span as i64),
            PeriodUnit::Month => {
                let (year, month) = shift_month_index(start.year(), start.month(), span as i32);
                clamped_ymd(year, month, self.start_day_anchor())
            }
            PeriodUnit::Year => clamped_ymd(start.year() + span as i32, 1, self.start_day_anchor()),
        }
    }
}

impl Default for SettlementPeriod {
    fn default() -> Self {
        Self::monthly(1, 1, 31, 0)
    }
}

impl fmt::Display for SettlementPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
