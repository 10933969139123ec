//! The counter aggregate: settlement definition, optional frequency limit,
//! reminder configuration, and the owned event log.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Displayable, Identifiable, NamedEntity},
    event_log::EventLog,
    frequency::FrequencyLimit,
    period::Period,
    reminder::ReminderConfig,
    settlement::SettlementPeriod,
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Icon tag attached to a counter. Opaque to the engine; rendered by UIs.
pub enum CounterIcon {
    Clock,
    Star,
    Heart,
    Book,
    Dumbbell,
    Cup,
    Pill,
    Leaf,
}

impl CounterIcon {
    pub const ALL: [CounterIcon; 8] = [
        CounterIcon::Clock,
        CounterIcon::Star,
        CounterIcon::Heart,
        CounterIcon::Book,
        CounterIcon::Dumbbell,
        CounterIcon::Cup,
        CounterIcon::Pill,
        CounterIcon::Leaf,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            CounterIcon::Clock => "clock",
            CounterIcon::Star => "star",
            CounterIcon::Heart => "heart",
            CounterIcon::Book => "book",
            CounterIcon::Dumbbell => "dumbbell",
            CounterIcon::Cup => "cup",
            CounterIcon::Pill => "pill",
            CounterIcon::Leaf => "leaf",
        }
    }
}

impl Default for CounterIcon {
    fn default() -> Self {
        CounterIcon::Clock
    }
}

impl fmt::Display for CounterIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raised when the frequency gate refuses a new occurrence. The log is left
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitExceeded;

impl fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("occurrence limit reached for the current frequency window")
    }
}

impl std::error::Error for LimitExceeded {}

/// One named counter with its settlement definition, optional frequency
/// limit, optional reminders, and exclusively-owned event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: CounterIcon,
    pub settlement: SettlementPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FrequencyLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderConfig>,
    #[serde(default)]
    pub log: EventLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Counter::schema_version_default")]
    pub schema_version: u8,
}

impl Counter {
    pub fn new(name: impl Into<String>, icon: CounterIcon, settlement: SettlementPeriod) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon,
            settlement,
            frequency: None,
            reminders: None,
            log: EventLog::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn with_frequency(mut self, frequency: FrequencyLimit) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// The settlement window containing `now`.
    pub fn current_period(&self, now: NaiveDateTime) -> Period {
        self.settlement.current_period(now)
    }

    /// Every settlement window from the first logged occurrence through the
    /// window reached by `now`. An empty log yields exactly the current
    /// window.
    pub fn all_periods(&self, now: NaiveDateTime) -> Vec<Period> {
        match self.log.earliest() {
            Some(earliest) => self.settlement.periods_since(earliest, now),
            None => vec![self.settlement.current_period(now)],
        }
    }

    /// Occurrences inside the window containing `now`.
    pub fn current_count(&self, now: NaiveDateTime) -> usize {
        self.log.count_in(&self.current_period(now))
    }

    /// Whether the frequency gate admits a new occurrence at `now`. Counters
    /// without a limit always admit.
    pub fn can_record(&self, now: NaiveDateTime) -> bool {
        match &self.frequency {
            Some(limit) => limit.can_increment(&self.log, now),
            None => true,
        }
    }

    /// Occurrences still admissible in the current window, or `None` when no
    /// limit is configured.
    pub fn remaining_allowance(&self, now: NaiveDateTime) -> Option<u32> {
        self.frequency
            .as_ref()
            .map(|limit| limit.remaining(&self.log, now))
    }

    /// Records one occurrence at `now`. The sole log mutation: checks the
    /// frequency gate first and appends only on success.
    pub fn record_occurrence(&mut self, now: NaiveDateTime) -> Result<(), LimitExceeded> {
        if !self.can_record(now) {
            return Err(LimitExceeded);
        }
        self.log.record(now);
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Identifiable for Counter {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Counter {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Counter {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.name, self.settlement.label())
    }
}
