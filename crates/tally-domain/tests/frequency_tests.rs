use chrono::{Duration, NaiveDate, NaiveDateTime};
use tally_domain::{EventLog, FrequencyLimit, WindowUnit};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

#[test]
fn hourly_limit_blocks_second_occurrence() {
    let limit = FrequencyLimit::new(WindowUnit::Hour, 1, 1);
    let now = at(2025, 11, 16, 14, 30, 0);
    let mut log = EventLog::new();
    log.record(now - Duration::minutes(10));

    assert_eq!(limit.window_count(&log, now), 1);
    assert!(!limit.can_increment(&log, now));
    assert_eq!(limit.remaining(&log, now), 0);
}

#[test]
fn window_truncates_to_unit_boundaries() {
    let now = at(2025, 11, 16, 14, 37, 22);

    let hour = FrequencyLimit::new(WindowUnit::Hour, 1, 1);
    assert_eq!(hour.window_start(now), at(2025, 11, 16, 14, 0, 0));

    let three_hours = FrequencyLimit::new(WindowUnit::Hour, 3, 1);
    assert_eq!(three_hours.window_start(now), at(2025, 11, 16, 12, 0, 0));

    let day = FrequencyLimit::new(WindowUnit::Day, 1, 1);
    assert_eq!(day.window_start(now), at(2025, 11, 16, 0, 0, 0));

    let week = FrequencyLimit::new(WindowUnit::Day, 7, 1);
    assert_eq!(week.window_start(now), at(2025, 11, 10, 0, 0, 0));

    let month = FrequencyLimit::new(WindowUnit::Month, 1, 1);
    assert_eq!(month.window_start(now), at(2025, 11, 1, 0, 0, 0));

    let year = FrequencyLimit::new(WindowUnit::Year, 1, 1);
    assert_eq!(year.window_start(now), at(2025, 1, 1, 0, 0, 0));
}

#[test]
fn month_window_steps_back_across_year_boundary() {
    let limit = FrequencyLimit::new(WindowUnit::Month, 2, 5);
    let now = at(2026, 1, 15, 9, 0, 0);
    assert_eq!(limit.window_start(now), at(2025, 12, 1, 0, 0, 0));

    let biennial = FrequencyLimit::new(WindowUnit::Year, 2, 5);
    assert_eq!(biennial.window_start(now), at(2025, 1, 1, 0, 0, 0));
}

#[test]
fn window_bounds_are_inclusive() {
    let limit = FrequencyLimit::new(WindowUnit::Hour, 1, 5);
    let now = at(2025, 11, 16, 14, 30, 0);
    let mut log = EventLog::new();
    log.record(at(2025, 11, 16, 14, 0, 0)); // exactly at the window start
    log.record(now); // exactly at the closing instant

    assert_eq!(limit.window_count(&log, now), 2);
}

#[test]
fn occurrences_before_the_window_do_not_count() {
    let limit = FrequencyLimit::new(WindowUnit::Hour, 1, 1);
    let now = at(2025, 11, 16, 14, 37, 0);
    let mut log = EventLog::new();
    log.record(at(2025, 11, 16, 13, 59, 59));

    assert_eq!(limit.window_count(&log, now), 0);
    assert!(limit.can_increment(&log, now));
    assert_eq!(limit.remaining(&log, now), 1);
}

#[test]
fn remaining_saturates_at_zero() {
    let limit = FrequencyLimit::new(WindowUnit::Day, 1, 2);
    let now = at(2025, 11, 16, 20, 0, 0);
    let mut log = EventLog::new();
    for minute in 0..4 {
        log.record(at(2025, 11, 16, 10, minute, 0));
    }

    assert_eq!(limit.window_count(&log, now), 4);
    assert_eq!(limit.remaining(&log, now), 0);
    assert!(!limit.can_increment(&log, now));
}

#[test]
fn labels_read_naturally() {
    assert_eq!(FrequencyLimit::new(WindowUnit::Hour, 1, 1).label(), "at most 1 per hour");
    assert_eq!(
        FrequencyLimit::new(WindowUnit::Day, 7, 3).label(),
        "at most 3 per 7 days"
    );
}
