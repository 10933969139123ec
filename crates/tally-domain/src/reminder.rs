//! Reminder definitions attached to a counter.
//!
//! Only the definitions and the trigger-condition pairing live here; actual
//! notification and geofence delivery is a host-platform concern behind
//! `tally-core`'s scheduler trait.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReminderFrequency::Daily => "daily",
            ReminderFrequency::Weekly => "weekly",
            ReminderFrequency::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

/// Fires at a wall-clock time on a recurring cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeReminder {
    pub hour: u32,
    pub minute: u32,
    pub frequency: ReminderFrequency,
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
}

impl TimeReminder {
    pub fn new(hour: u32, minute: u32, frequency: ReminderFrequency) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            frequency,
            is_enabled: true,
            notification_id: None,
        }
    }

    pub fn describe(&self) -> String {
        format!("{:02}:{:02} {}", self.hour, self.minute, self.frequency)
    }
}

/// Fires on entry into a circular geographic region.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationReminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<String>,
}

impl LocationReminder {
    pub fn new(name: Option<String>, latitude: f64, longitude: f64, radius_m: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
            radius_m,
            is_enabled: true,
            region_id: None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({:.0} m)", name, self.radius_m),
            None => format!("{:.4},{:.4} ({:.0} m)", self.latitude, self.longitude, self.radius_m),
        }
    }
}

/// One registered trigger: a time reminder, a location reminder, or a paired
/// combination of both (time fires only while inside the location).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
}

/// All reminders configured for one counter plus the derived trigger list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReminderConfig {
    #[serde(default)]
    pub time_reminders: Vec<TimeReminder>,
    #[serde(default)]
    pub location_reminders: Vec<LocationReminder>,
    #[serde(default)]
    pub trigger_conditions: Vec<TriggerCondition>,
}

impl ReminderConfig {
    pub fn is_empty(&self) -> bool {
        self.time_reminders.is_empty() && self.location_reminders.is_empty()
    }

    /// Rebuilds the trigger list from the enabled reminders: the cartesian
    /// product of enabled times and locations when both exist, otherwise each
    /// enabled reminder stands alone. Registration ids are reset; the
    /// scheduler fills them back in.
    pub fn recompute_trigger_conditions(&mut self) {
        let times: Vec<usize> = self
            .time_reminders
            .iter()
            .enumerate()
            .filter(|(_, reminder)| reminder.is_enabled)
            .map(|(index, _)| index)
            .collect();
        let locations: Vec<usize> = self
            .location_reminders
            .iter()
            .enumerate()
            .filter(|(_, reminder)| reminder.is_enabled)
            .map(|(index, _)| index)
            .collect();

        let mut conditions = Vec::new();
        if !times.is_empty() && !locations.is_empty() {
            for &time_index in &times {
                for &location_index in &locations {
                    conditions.push(TriggerCondition {
                        time_index: Some(time_index),
                        location_index: Some(location_index),
                        notification_id: None,
                    });
                }
            }
        } else {
            for &time_index in &times {
                conditions.push(TriggerCondition {
                    time_index: Some(time_index),
                    location_index: None,
                    notification_id: None,
                });
            }
            for &location_index in &locations {
                conditions.push(TriggerCondition {
                    time_index: None,
                    location_index: Some(location_index),
                    notification_id: None,
                });
            }
        }
        self.trigger_conditions = conditions;
    }

    /// Notification ids currently registered with the host scheduler.
    pub fn active_notification_ids(&self) -> Vec<String> {
        self.trigger_conditions
            .iter()
            .filter_map(|condition| condition.notification_id.clone())
            .collect()
    }

    /// Region ids currently monitored by the host scheduler.
    pub fn active_region_ids(&self) -> Vec<String> {
        self.location_reminders
            .iter()
            .filter_map(|reminder| reminder.region_id.clone())
            .collect()
    }
}
