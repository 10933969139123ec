//! Read-only period and history reports over a counter.

use chrono::NaiveDateTime;

use tally_domain::{Counter, Period};

/// Snapshot of the active settlement window for display.
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub period: Period,
    pub count: usize,
    pub total: usize,
    pub can_record: bool,
    pub remaining: Option<u32>,
}

/// One historical settlement window and its occurrence count.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub period: Period,
    pub count: usize,
}

/// Derives display-oriented views; every query re-reads the aggregate, so
/// callers observe mutations by querying again.
pub struct ReportService;

impl ReportService {
    /// The active window with its count and gate verdict.
    pub fn current(counter: &Counter, now: NaiveDateTime) -> PeriodReport {
        let period = counter.current_period(now);
        PeriodReport {
            period,
            count: counter.log.count_in(&period),
            total: counter.log.total(),
            can_record: counter.can_record(now),
            remaining: counter.remaining_allowance(now),
        }
    }

    /// Every settlement window since the first occurrence, newest first.
    pub fn history(counter: &Counter, now: NaiveDateTime) -> Vec<PeriodSummary> {
        let mut summaries: Vec<PeriodSummary> = counter
            .all_periods(now)
            .into_iter()
            .map(|period| PeriodSummary {
                count: counter.log.count_in(&period),
                period,
            })
            .collect();
        summaries.reverse();
        summaries
    }

    /// Occurrence instants inside one window, ascending.
    pub fn entries(counter: &Counter, period: &Period) -> Vec<NaiveDateTime> {
        counter.log.entries_in(period)
    }
}
