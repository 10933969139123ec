use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};

use tally_domain::{
    CounterIcon, FrequencyLimit, LocationReminder, ReminderConfig, ReminderFrequency,
    SettlementPeriod, TimeReminder, WindowUnit,
};

use crate::{
    counter_service::CounterService,
    reminder_service::{ReminderScheduler, ReminderService, ReminderTarget},
    report_service::ReportService,
    storage::counter_warnings,
    Clock, CoreError,
};

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Default)]
struct RecordingScheduler {
    scheduled: Mutex<Vec<String>>,
    monitored: Mutex<Vec<String>>,
    cancelled: Mutex<Vec<String>>,
}

impl ReminderScheduler for RecordingScheduler {
    fn schedule_time(
        &self,
        target: &ReminderTarget,
        reminder: &TimeReminder,
        paired: &[LocationReminder],
    ) -> Result<Option<String>, CoreError> {
        let id = format!(
            "time:{}:{}:{}",
            target.counter_name,
            reminder.describe(),
            paired.len()
        );
        self.scheduled.lock().unwrap().push(id.clone());
        Ok(Some(id))
    }

    fn monitor_region(
        &self,
        target: &ReminderTarget,
        reminder: &LocationReminder,
        paired: bool,
    ) -> Result<Option<String>, CoreError> {
        let id = format!("region:{}:{}:{}", target.counter_name, reminder.describe(), paired);
        self.monitored.lock().unwrap().push(id.clone());
        Ok(Some(id))
    }

    fn cancel_notifications(&self, ids: &[String]) -> Result<(), CoreError> {
        self.cancelled.lock().unwrap().extend(ids.iter().cloned());
        Ok(())
    }

    fn stop_monitoring(&self, region_ids: &[String]) -> Result<(), CoreError> {
        self.cancelled.lock().unwrap().extend(region_ids.iter().cloned());
        Ok(())
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn create_validates_parameters() {
    let err = CounterService::create("", CounterIcon::Clock, SettlementPeriod::daily(1), None)
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = CounterService::create(
        "Coffee",
        CounterIcon::Cup,
        SettlementPeriod::monthly(0, 1, 31, 0),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = CounterService::create(
        "Coffee",
        CounterIcon::Cup,
        SettlementPeriod::monthly(1, 32, 31, 0),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let err = CounterService::create(
        "Coffee",
        CounterIcon::Cup,
        SettlementPeriod::daily(1),
        Some(FrequencyLimit::new(WindowUnit::Hour, 1, 0)),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn record_appends_exactly_one_occurrence() {
    let mut counter = CounterService::create(
        "Coffee",
        CounterIcon::Cup,
        SettlementPeriod::monthly(1, 1, 31, 0),
        Some(FrequencyLimit::new(WindowUnit::Day, 1, 2)),
    )
    .unwrap();
    let clock = FixedClock(at(2025, 11, 16, 9, 30));

    let before = counter.log.total();
    let instant = CounterService::record(&mut counter, &clock).unwrap();
    assert_eq!(instant, clock.now());
    assert_eq!(counter.log.total(), before + 1);
}

#[test]
fn record_maps_gate_refusal_to_limit_exceeded() {
    let mut counter = CounterService::create(
        "Overtime",
        CounterIcon::Clock,
        SettlementPeriod::monthly(1, 1, 31, 0),
        Some(FrequencyLimit::new(WindowUnit::Hour, 1, 1)),
    )
    .unwrap();
    let clock = FixedClock(at(2025, 11, 16, 14, 5));

    CounterService::record(&mut counter, &clock).unwrap();
    let err = CounterService::record(&mut counter, &clock).unwrap_err();
    assert!(matches!(err, CoreError::LimitExceeded));
    assert_eq!(counter.log.total(), 1);
}

#[test]
fn settlement_edits_reshape_reports() {
    let mut counter = CounterService::create(
        "Standup",
        CounterIcon::Star,
        SettlementPeriod::monthly(1, 1, 31, 0),
        None,
    )
    .unwrap();
    let clock = FixedClock(at(2025, 11, 3, 10, 0));
    CounterService::record(&mut counter, &clock).unwrap();

    let now = at(2025, 11, 16, 12, 0);
    assert_eq!(ReportService::history(&counter, now).len(), 1);

    CounterService::set_settlement(&mut counter, SettlementPeriod::daily(7)).unwrap();
    let history = ReportService::history(&counter, now);
    assert_eq!(history.len(), 2);
    // Newest first; the opening week holds the single occurrence.
    assert_eq!(history[0].count, 0);
    assert_eq!(history[1].count, 1);
}

#[test]
fn current_report_reflects_the_gate() {
    let mut counter = CounterService::create(
        "Meds",
        CounterIcon::Pill,
        SettlementPeriod::daily(1),
        Some(FrequencyLimit::new(WindowUnit::Day, 1, 2)),
    )
    .unwrap();
    let now = at(2025, 11, 16, 8, 0);
    counter.record_occurrence(now).unwrap();

    let report = ReportService::current(&counter, now);
    assert_eq!(report.count, 1);
    assert_eq!(report.total, 1);
    assert!(report.can_record);
    assert_eq!(report.remaining, Some(1));
    assert_eq!(
        ReportService::entries(&counter, &report.period),
        vec![now]
    );
}

#[test]
fn clear_frequency_reports_whether_a_limit_existed() {
    let mut counter = CounterService::create(
        "Pages",
        CounterIcon::Book,
        SettlementPeriod::daily(1),
        Some(FrequencyLimit::new(WindowUnit::Day, 1, 1)),
    )
    .unwrap();
    assert!(CounterService::clear_frequency(&mut counter));
    assert!(!CounterService::clear_frequency(&mut counter));
    assert!(counter.can_record(at(2025, 11, 16, 8, 0)));
}

#[test]
fn reminder_sync_registers_paired_triggers() {
    let mut counter = CounterService::create(
        "Gym",
        CounterIcon::Dumbbell,
        SettlementPeriod::daily(1),
        None,
    )
    .unwrap();
    counter.reminders = Some(ReminderConfig {
        time_reminders: vec![TimeReminder::new(18, 0, ReminderFrequency::Daily)],
        location_reminders: vec![LocationReminder::new(Some("Gym".into()), 31.2, 121.5, 150.0)],
        trigger_conditions: Vec::new(),
    });

    let scheduler = RecordingScheduler::default();
    ReminderService::sync(&mut counter, &scheduler).unwrap();

    let config = counter.reminders.as_ref().unwrap();
    assert_eq!(config.trigger_conditions.len(), 1);
    assert!(config.trigger_conditions[0].notification_id.is_some());
    assert!(config.location_reminders[0].region_id.is_some());
    assert_eq!(scheduler.scheduled.lock().unwrap().len(), 1);
    // The region arms the paired trigger rather than firing on entry.
    assert!(scheduler.monitored.lock().unwrap()[0].ends_with(":true"));
}

#[test]
fn reminder_sync_cancels_stale_registrations() {
    let mut counter = CounterService::create(
        "Gym",
        CounterIcon::Dumbbell,
        SettlementPeriod::daily(1),
        None,
    )
    .unwrap();
    let mut config = ReminderConfig {
        time_reminders: vec![TimeReminder::new(18, 0, ReminderFrequency::Daily)],
        location_reminders: Vec::new(),
        trigger_conditions: Vec::new(),
    };
    config.recompute_trigger_conditions();
    config.trigger_conditions[0].notification_id = Some("stale-notification".into());
    counter.reminders = Some(config);

    let scheduler = RecordingScheduler::default();
    ReminderService::sync(&mut counter, &scheduler).unwrap();
    assert!(scheduler
        .cancelled
        .lock()
        .unwrap()
        .contains(&"stale-notification".to_string()));

    ReminderService::cancel_all(&mut counter, &scheduler).unwrap();
    let config = counter.reminders.as_ref().unwrap();
    assert!(config.active_notification_ids().is_empty());
}

#[test]
fn warnings_flag_dangling_trigger_indices() {
    let mut counter = CounterService::create(
        "Gym",
        CounterIcon::Dumbbell,
        SettlementPeriod::daily(1),
        None,
    )
    .unwrap();
    assert!(counter_warnings(&counter).is_empty());

    let mut config = ReminderConfig::default();
    config.time_reminders.push(TimeReminder::new(9, 0, ReminderFrequency::Daily));
    config.recompute_trigger_conditions();
    config.time_reminders.clear();
    counter.reminders = Some(config);

    let warnings = counter_warnings(&counter);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("unknown time reminder"));
}
