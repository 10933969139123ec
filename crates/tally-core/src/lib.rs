//! tally-core
//!
//! Business logic and services for tally.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct storage
//! interactions.

pub mod counter_service;
pub mod error;
pub mod reminder_service;
pub mod report_service;
pub mod storage;
pub mod time;

pub use counter_service::CounterService;
pub use error::CoreError;
pub use reminder_service::{ReminderScheduler, ReminderService, ReminderTarget};
pub use report_service::{PeriodReport, PeriodSummary, ReportService};
pub use time::Clock;

#[cfg(test)]
mod tests;
