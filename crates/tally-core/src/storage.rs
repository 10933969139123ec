use std::path::{Path, PathBuf};

use tally_domain::Counter;

use crate::CoreError;

/// Describes a persisted backup artifact for a counter.
#[derive(Debug, Clone)]
pub struct CounterBackupInfo {
    pub counter: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing counters and
/// backups.
pub trait CounterStorage: Send + Sync {
    fn save_counter(&self, name: &str, counter: &Counter) -> Result<(), CoreError>;
    fn load_counter(&self, name: &str) -> Result<Counter, CoreError>;
    fn list_counters(&self) -> Result<Vec<String>, CoreError>;
    fn delete_counter(&self, name: &str) -> Result<(), CoreError>;
    fn save_counter_to_path(&self, counter: &Counter, path: &Path) -> Result<(), CoreError>;
    fn load_counter_from_path(&self, path: &Path) -> Result<Counter, CoreError>;
    fn backup_counter(
        &self,
        name: &str,
        counter: &Counter,
        note: Option<&str>,
    ) -> Result<CounterBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<CounterBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &CounterBackupInfo) -> Result<Counter, CoreError>;
}

/// Detects degenerate parameters and dangling references within a loaded
/// counter snapshot.
pub fn counter_warnings(counter: &Counter) -> Vec<String> {
    let mut warnings = Vec::new();

    if counter.settlement.span == 0 {
        warnings.push(format!("counter {} has a zero settlement span", counter.id));
    }
    if let Some(limit) = counter.frequency.as_ref() {
        if limit.window_span == 0 {
            warnings.push(format!("counter {} has a zero frequency window", counter.id));
        }
        if limit.max_count == 0 {
            warnings.push(format!(
                "counter {} has a frequency limit that admits nothing",
                counter.id
            ));
        }
    }
    if let Some(config) = counter.reminders.as_ref() {
        for (index, condition) in config.trigger_conditions.iter().enumerate() {
            if let Some(time_index) = condition.time_index {
                if time_index >= config.time_reminders.len() {
                    warnings.push(format!(
                        "trigger condition {} references unknown time reminder {}",
                        index, time_index
                    ));
                }
            }
            if let Some(location_index) = condition.location_index {
                if location_index >= config.location_reminders.len() {
                    warnings.push(format!(
                        "trigger condition {} references unknown location reminder {}",
                        index, location_index
                    ));
                }
            }
        }
    }
    warnings
}
