use chrono::{NaiveDate, NaiveDateTime};
use tally_domain::SettlementPeriod;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn calendar_month_period_runs_first_to_last_day() {
    let settlement = SettlementPeriod::monthly(1, 1, 31, 0);
    let period = settlement.current_period(at(2025, 11, 16, 12, 0));

    assert_eq!(period.start, date(2025, 11, 1).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(period.end, date(2025, 11, 30).and_hms_opt(23, 59, 59).unwrap());
}

#[test]
fn offset_month_period_rolls_back_before_start_day() {
    // Pay-cycle style window: 25th through the 24th of the next month.
    let settlement = SettlementPeriod::monthly(1, 25, 24, 1);
    let period = settlement.current_period(at(2025, 11, 16, 12, 0));

    assert_eq!(period.start_date(), date(2025, 10, 25));
    assert_eq!(period.end, date(2025, 11, 24).and_hms_opt(23, 59, 59).unwrap());
}

#[test]
fn offset_month_period_opens_on_start_day() {
    let settlement = SettlementPeriod::monthly(1, 25, 24, 1);
    let period = settlement.current_period(at(2025, 11, 26, 8, 30));

    assert_eq!(period.start_date(), date(2025, 11, 25));
    assert_eq!(period.end_date(), date(2025, 12, 24));
}

#[test]
fn offset_month_period_crosses_year_boundary() {
    let settlement = SettlementPeriod::monthly(1, 25, 24, 1);
    let period = settlement.current_period(at(2026, 1, 10, 0, 5));

    assert_eq!(period.start_date(), date(2025, 12, 25));
    assert_eq!(period.end_date(), date(2026, 1, 24));
}

#[test]
fn day_period_spans_whole_days() {
    let settlement = SettlementPeriod::daily(1);
    let period = settlement.current_period(at(2025, 11, 16, 23, 59));
    assert_eq!(period.start_date(), date(2025, 11, 16));
    assert_eq!(period.end_date(), date(2025, 11, 16));

    let week = SettlementPeriod::daily(7).current_period(at(2025, 11, 16, 0, 0));
    assert_eq!(week.start_date(), date(2025, 11, 16));
    assert_eq!(week.end_date(), date(2025, 11, 22));
}

#[test]
fn year_period_anchors_on_january_start_day() {
    let settlement = SettlementPeriod::yearly(1, 1, 31);
    let period = settlement.current_period(at(2025, 6, 10, 10, 0));
    assert_eq!(period.start_date(), date(2025, 1, 1));
    assert_eq!(period.end_date(), date(2025, 12, 31));
}

#[test]
fn year_period_rolls_back_before_start_anchor() {
    let settlement = SettlementPeriod::yearly(1, 15, 31);
    let period = settlement.current_period(at(2025, 1, 10, 9, 0));
    assert_eq!(period.start_date(), date(2024, 1, 15));
    assert_eq!(period.end_date(), date(2024, 12, 31));
}

#[test]
fn multi_year_span_extends_end_year() {
    let settlement = SettlementPeriod::yearly(2, 1, 31);
    let period = settlement.current_period(at(2024, 3, 1, 0, 0));
    assert_eq!(period.start_date(), date(2024, 1, 1));
    assert_eq!(period.end_date(), date(2025, 12, 31));
}

#[test]
fn day_anchors_clamp_to_short_months() {
    // Start day 31 referenced from mid-February anchors on January 31; the
    // end day 30 clamps to February's actual length.
    let settlement = SettlementPeriod::monthly(1, 31, 30, 1);
    let period = settlement.current_period(at(2025, 2, 15, 12, 0));

    assert_eq!(period.start_date(), date(2025, 1, 31));
    assert_eq!(period.end_date(), date(2025, 2, 28));
}

#[test]
fn enumeration_reclamps_start_anchor_every_month() {
    let settlement = SettlementPeriod::monthly(1, 31, 30, 1);
    let periods = settlement.periods_since(at(2025, 1, 31, 0, 0), at(2025, 3, 31, 12, 0));

    let starts: Vec<NaiveDate> = periods.iter().map(|p| p.start_date()).collect();
    assert_eq!(starts, vec![date(2025, 1, 31), date(2025, 2, 28), date(2025, 3, 31)]);
}

#[test]
fn weekly_enumeration_stops_at_the_window_holding_now() {
    let settlement = SettlementPeriod::daily(7);
    let periods = settlement.periods_since(at(2025, 1, 1, 8, 0), at(2025, 1, 20, 9, 0));

    assert_eq!(periods.len(), 3);
    assert_eq!(periods[0].start_date(), date(2025, 1, 1));
    assert_eq!(periods[0].end_date(), date(2025, 1, 7));
    assert_eq!(periods[1].start_date(), date(2025, 1, 8));
    assert_eq!(periods[1].end_date(), date(2025, 1, 14));
    assert_eq!(periods[2].start_date(), date(2025, 1, 15));
    assert_eq!(periods[2].end_date(), date(2025, 1, 21));
    assert!(periods[2].contains(at(2025, 1, 20, 9, 0)));
}

#[test]
fn enumeration_is_gap_free_and_non_overlapping() {
    let settlements = [
        SettlementPeriod::monthly(1, 1, 31, 0),
        SettlementPeriod::monthly(1, 25, 24, 1),
        SettlementPeriod::monthly(2, 5, 4, 1),
        SettlementPeriod::daily(10),
    ];
    let earliest = at(2024, 3, 10, 7, 0);
    let now = at(2025, 11, 16, 12, 0);

    for settlement in &settlements {
        let periods = settlement.periods_since(earliest, now);
        assert!(periods.len() > 1, "{} should span several windows", settlement);
        assert!(periods[0].contains(earliest));
        for pair in periods.windows(2) {
            assert!(
                pair[0].end < pair[1].start,
                "{}: windows must not overlap",
                settlement
            );
            assert_eq!(
                pair[0].end_date().succ_opt().unwrap(),
                pair[1].start_date(),
                "{}: windows must be calendar-contiguous",
                settlement
            );
        }
    }
}

#[test]
fn quarterly_enumeration_absorbs_month_lengths() {
    let settlement = SettlementPeriod::monthly(3, 1, 31, 0);
    let periods = settlement.periods_since(at(2025, 1, 15, 0, 0), at(2025, 8, 10, 0, 0));

    let bounds: Vec<(NaiveDate, NaiveDate)> = periods
        .iter()
        .map(|p| (p.start_date(), p.end_date()))
        .collect();
    assert_eq!(
        bounds,
        vec![
            (date(2025, 1, 1), date(2025, 3, 31)),
            (date(2025, 4, 1), date(2025, 6, 30)),
            (date(2025, 7, 1), date(2025, 9, 30)),
        ]
    );
}

#[test]
fn current_period_always_contains_the_reference() {
    let settlements = [
        SettlementPeriod::daily(1),
        SettlementPeriod::daily(14),
        SettlementPeriod::monthly(1, 1, 31, 0),
        SettlementPeriod::monthly(1, 25, 24, 1),
        SettlementPeriod::monthly(2, 5, 4, 1),
        SettlementPeriod::yearly(1, 1, 31),
    ];
    let mut probe = at(2024, 1, 1, 13, 45);
    for _ in 0..500 {
        for settlement in &settlements {
            let period = settlement.current_period(probe);
            assert!(
                period.contains(probe),
                "{}: {} not inside {}",
                settlement,
                probe,
                period
            );
        }
        probe += chrono::Duration::days(1);
    }
}

#[test]
fn current_period_is_idempotent() {
    let settlement = SettlementPeriod::monthly(1, 25, 24, 1);
    let now = at(2025, 11, 16, 12, 0);
    assert_eq!(settlement.current_period(now), settlement.current_period(now));
}

#[test]
fn labels_follow_cadence() {
    assert_eq!(SettlementPeriod::daily(1).label(), "Daily");
    assert_eq!(SettlementPeriod::monthly(1, 1, 31, 0).label(), "Monthly");
    assert_eq!(SettlementPeriod::monthly(2, 1, 31, 0).label(), "Every 2 Months");
    assert_eq!(SettlementPeriod::yearly(1, 1, 31).label(), "Yearly");
}
