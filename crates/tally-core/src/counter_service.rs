//! Constructor and mutation helpers for [`Counter`] aggregates.

use chrono::NaiveDateTime;

use tally_domain::{Counter, CounterIcon, FrequencyLimit, PeriodUnit, SettlementPeriod};

use crate::{Clock, CoreError};

/// Provides validated constructor and mutation helpers for counters. All
/// period/window views are re-derived from current parameters after an edit;
/// logged occurrences are never rewritten.
pub struct CounterService;

impl CounterService {
    /// Creates a new counter after validating its parameters.
    pub fn create(
        name: impl Into<String>,
        icon: CounterIcon,
        settlement: SettlementPeriod,
        frequency: Option<FrequencyLimit>,
    ) -> Result<Counter, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("counter name must not be empty".into()));
        }
        Self::validate_settlement(&settlement)?;
        let mut counter = Counter::new(name, icon, settlement);
        if let Some(limit) = frequency {
            Self::validate_frequency(&limit)?;
            counter.frequency = Some(limit);
        }
        Ok(counter)
    }

    /// Renames a counter.
    pub fn rename(counter: &mut Counter, new_name: impl Into<String>) -> Result<(), CoreError> {
        let new_name = new_name.into();
        if new_name.trim().is_empty() {
            return Err(CoreError::Validation("counter name must not be empty".into()));
        }
        counter.name = new_name;
        counter.touch();
        Ok(())
    }

    pub fn set_icon(counter: &mut Counter, icon: CounterIcon) {
        counter.icon = icon;
        counter.touch();
    }

    /// Replaces the settlement definition. Reported history reshapes under
    /// the new parameters on the next read.
    pub fn set_settlement(
        counter: &mut Counter,
        settlement: SettlementPeriod,
    ) -> Result<(), CoreError> {
        Self::validate_settlement(&settlement)?;
        counter.settlement = settlement;
        counter.touch();
        Ok(())
    }

    /// Installs or replaces the frequency limit.
    pub fn set_frequency(counter: &mut Counter, limit: FrequencyLimit) -> Result<(), CoreError> {
        Self::validate_frequency(&limit)?;
        counter.frequency = Some(limit);
        counter.touch();
        Ok(())
    }

    /// Removes the frequency limit, returning whether one was configured.
    pub fn clear_frequency(counter: &mut Counter) -> bool {
        let had_limit = counter.frequency.is_some();
        if had_limit {
            counter.frequency = None;
            counter.touch();
        }
        had_limit
    }

    /// Records one occurrence at the clock's current instant. The only
    /// state-changing entry point; refusal leaves the log untouched.
    pub fn record(counter: &mut Counter, clock: &dyn Clock) -> Result<NaiveDateTime, CoreError> {
        let now = clock.now();
        counter.record_occurrence(now)?;
        Ok(now)
    }

    fn validate_settlement(settlement: &SettlementPeriod) -> Result<(), CoreError> {
        if settlement.span == 0 {
            return Err(CoreError::Validation("settlement span must be at least 1".into()));
        }
        if settlement.unit != PeriodUnit::Day {
            for (label, value) in [("start", settlement.start_day), ("end", settlement.end_day)] {
                if let Some(day) = value {
                    if !(1..=31).contains(&day) {
                        return Err(CoreError::Validation(format!(
                            "{label} day must be between 1 and 31, got {day}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_frequency(limit: &FrequencyLimit) -> Result<(), CoreError> {
        if limit.window_span == 0 {
            return Err(CoreError::Validation("frequency window span must be at least 1".into()));
        }
        if limit.max_count == 0 {
            return Err(CoreError::Validation("frequency max count must be at least 1".into()));
        }
        Ok(())
    }
}
