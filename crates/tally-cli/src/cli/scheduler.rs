use tracing::{debug, info};
use uuid::Uuid;

use tally_core::{CoreError, ReminderScheduler, ReminderTarget};
use tally_domain::{LocationReminder, TimeReminder};

/// Reminder scheduler for the shell host: records registration intent via
/// tracing and hands out ids. Actual notification and geofence delivery
/// belongs to platform hosts that embed the core.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReminderScheduler;

impl ReminderScheduler for LoggingReminderScheduler {
    fn schedule_time(
        &self,
        target: &ReminderTarget,
        reminder: &TimeReminder,
        paired: &[LocationReminder],
    ) -> Result<Option<String>, CoreError> {
        if !reminder.is_enabled {
            return Ok(None);
        }
        let id = Uuid::new_v4().to_string();
        info!(
            counter = %target.counter_name,
            trigger = %reminder.describe(),
            paired = paired.len(),
            "registered time trigger"
        );
        Ok(Some(id))
    }

    fn monitor_region(
        &self,
        target: &ReminderTarget,
        reminder: &LocationReminder,
        paired: bool,
    ) -> Result<Option<String>, CoreError> {
        if !reminder.is_enabled {
            return Ok(None);
        }
        let id = Uuid::new_v4().to_string();
        info!(
            counter = %target.counter_name,
            region = %reminder.describe(),
            paired,
            "monitoring region"
        );
        Ok(Some(id))
    }

    fn cancel_notifications(&self, ids: &[String]) -> Result<(), CoreError> {
        debug!(count = ids.len(), "cancelled time triggers");
        Ok(())
    }

    fn stop_monitoring(&self, region_ids: &[String]) -> Result<(), CoreError> {
        debug!(count = region_ids.len(), "stopped region monitoring");
        Ok(())
    }
}
