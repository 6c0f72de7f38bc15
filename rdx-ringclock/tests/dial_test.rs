use chrono_tz::Tz;
use ringclock::prelude::*;

fn state_at(text: &str) -> DialState {
    let mut dial = Dial::default();
    dial.set_date(text, &Tz::UTC);
    dial.state()
}

fn active(state: &DialState, kind: RingKind) -> Option<usize> {
    state.ring(kind).and_then(|ring| ring.active)
}

#[test]
fn leap_day_midnight() {
    let state = state_at("2024-02-29T00:00:00");

    assert_eq!(state.ring(RingKind::Day).unwrap().items.len(), 29);
    assert_eq!(active(&state, RingKind::Day), Some(28));
    assert_eq!(active(&state, RingKind::Month), Some(1));
    assert_eq!(active(&state, RingKind::Weekday), Some(3));
    assert_eq!(active(&state, RingKind::Hour), Some(0));
    assert_eq!(active(&state, RingKind::Minute), Some(0));
    assert_eq!(active(&state, RingKind::Second), Some(0));
}

#[test]
fn last_second_of_new_years_day() {
    let state = state_at("2023-01-01T23:59:59");

    assert_eq!(state.ring(RingKind::Day).unwrap().items.len(), 31);
    assert_eq!(active(&state, RingKind::Day), Some(0));
    assert_eq!(active(&state, RingKind::Month), Some(0));
    assert_eq!(active(&state, RingKind::Weekday), Some(6));
    assert_eq!(active(&state, RingKind::Hour), Some(23));
    assert_eq!(active(&state, RingKind::Minute), Some(59));
    assert_eq!(active(&state, RingKind::Second), Some(59));
}

#[test]
fn every_active_item_sits_at_the_reference_position() {
    let state = state_at("2023-11-17T08:42:13");
    for ring in &state.rings {
        let index = ring.active.expect("active item");
        let rotation = ring.rotation.expect("rotation");
        assert!(
            (ring.items[index].angle + rotation).abs() < 1e-9,
            "{} ring is off by {}",
            ring.kind,
            ring.items[index].angle + rotation
        );
    }
}

#[test]
fn invalid_text_leaves_no_active_items() {
    let mut dial = Dial::default();
    dial.set_date("2024-02-29T00:00:00", &Tz::UTC);
    let events = dial.set_date("2024-13-45T99:00:00", &Tz::UTC);

    assert!(matches!(events.first(), Some(DialEvent::InvalidTimestamp { .. })));
    let state = dial.state();
    assert_eq!(state.timestamp, None);
    for ring in &state.rings {
        assert_eq!(ring.active, None);
        assert_eq!(ring.rotation, None);
    }
}

#[test]
fn configured_rings_drive_the_layout() {
    let config = DialConfig::from_toml_str(
        r#"
        [[rings]]
        kind = "weekday"
        sweep = "full360"

        [[rings]]
        kind = "second"
        "#,
    )
    .unwrap();
    let mut dial = Dial::from_config(&config);
    dial.set_date("2024-02-26T00:00:00", &config.timezone);
    let state = dial.state();

    assert_eq!(state.rings.len(), 2);
    let weekday = state.ring(RingKind::Weekday).unwrap();
    assert_eq!(weekday.sweep, SweepMode::Full360);
    assert_eq!(weekday.active_label(), Some("Mon"));
    assert!((weekday.rotation.unwrap() - (180.0 - 360.0 / 14.0)).abs() < 1e-9);
    assert!(state.ring(RingKind::Day).is_none());
}

#[test]
fn days_in_month_over_a_leap_cycle() {
    for year in 2020..=2024 {
        let leap = year % 4 == 0;
        assert_eq!(days_in_month(2, year), Some(if leap { 29 } else { 28 }));
        assert_eq!(days_in_month(4, year), Some(30));
        assert_eq!(days_in_month(12, year), Some(31));
    }
}
