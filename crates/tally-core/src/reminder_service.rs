//! Reminder registration against a host-platform scheduler.

use tracing::warn;
use uuid::Uuid;

use tally_domain::{Counter, LocationReminder, TimeReminder};

use crate::CoreError;

/// Identifies the counter a trigger belongs to when it fires.
#[derive(Debug, Clone)]
pub struct ReminderTarget {
    pub counter_id: Uuid,
    pub counter_name: String,
}

/// Host-platform port for reminder delivery: schedule or cancel triggers for
/// a counter. Delivery semantics (notification centers, geofence engines,
/// permission prompts) are owned entirely by the implementation.
pub trait ReminderScheduler: Send + Sync {
    /// Registers a recurring time trigger. When `paired` is non-empty the
    /// trigger should only fire while inside one of those regions. Returns
    /// the registration id, or `None` when nothing was scheduled.
    fn schedule_time(
        &self,
        target: &ReminderTarget,
        reminder: &TimeReminder,
        paired: &[LocationReminder],
    ) -> Result<Option<String>, CoreError>;

    /// Starts monitoring a circular region. `paired` marks regions that only
    /// arm paired time triggers instead of firing on entry.
    fn monitor_region(
        &self,
        target: &ReminderTarget,
        reminder: &LocationReminder,
        paired: bool,
    ) -> Result<Option<String>, CoreError>;

    fn cancel_notifications(&self, ids: &[String]) -> Result<(), CoreError>;

    fn stop_monitoring(&self, region_ids: &[String]) -> Result<(), CoreError>;
}

/// Keeps a counter's trigger registrations in sync with its reminder
/// configuration.
pub struct ReminderService;

impl ReminderService {
    /// Re-registers every enabled reminder: cancels stale registrations,
    /// recomputes the trigger list, then registers regions and time triggers.
    pub fn sync(counter: &mut Counter, scheduler: &dyn ReminderScheduler) -> Result<(), CoreError> {
        let Some(mut config) = counter.reminders.take() else {
            return Ok(());
        };

        scheduler.cancel_notifications(&config.active_notification_ids())?;
        scheduler.stop_monitoring(&config.active_region_ids())?;

        config.recompute_trigger_conditions();
        let target = ReminderTarget {
            counter_id: counter.id,
            counter_name: counter.name.clone(),
        };

        for index in 0..config.location_reminders.len() {
            if config.location_reminders[index].is_enabled {
                let paired = config.trigger_conditions.iter().any(|condition| {
                    condition.location_index == Some(index) && condition.time_index.is_some()
                });
                let region_id =
                    scheduler.monitor_region(&target, &config.location_reminders[index], paired)?;
                config.location_reminders[index].region_id = region_id;
            } else {
                config.location_reminders[index].region_id = None;
            }
        }

        for index in 0..config.trigger_conditions.len() {
            let condition = config.trigger_conditions[index].clone();
            let Some(time_index) = condition.time_index else {
                // Location-only triggers fire through the monitored region.
                continue;
            };
            let Some(time) = config.time_reminders.get(time_index).cloned() else {
                warn!(time_index, "trigger condition references a missing time reminder");
                continue;
            };
            let paired: Vec<LocationReminder> = condition
                .location_index
                .and_then(|location_index| config.location_reminders.get(location_index))
                .cloned()
                .into_iter()
                .collect();
            config.trigger_conditions[index].notification_id =
                scheduler.schedule_time(&target, &time, &paired)?;
        }

        counter.reminders = Some(config);
        counter.touch();
        Ok(())
    }

    /// Cancels every registration and clears the stored ids.
    pub fn cancel_all(
        counter: &mut Counter,
        scheduler: &dyn ReminderScheduler,
    ) -> Result<(), CoreError> {
        let Some(config) = counter.reminders.as_mut() else {
            return Ok(());
        };
        scheduler.cancel_notifications(&config.active_notification_ids())?;
        scheduler.stop_monitoring(&config.active_region_ids())?;
        for condition in &mut config.trigger_conditions {
            condition.notification_id = None;
        }
        for reminder in &mut config.location_reminders {
            reminder.region_id = None;
        }
        counter.touch();
        Ok(())
    }
}
