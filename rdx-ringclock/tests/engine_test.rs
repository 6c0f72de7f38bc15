use ringclock::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn manual_config() -> DialConfig {
    DialConfig {
        auto_advance: false,
        ..DialConfig::default()
    }
}

#[tokio::test]
async fn starts_without_active_items_when_not_advancing() {
    let engine = DialEngine::new(manual_config());
    let state = engine.state().await;
    assert_eq!(state.timestamp, None);
    assert!(state.rings.iter().all(|ring| ring.active.is_none()));
}

#[tokio::test]
async fn starts_at_the_configured_date() {
    let engine = DialEngine::new(DialConfig {
        date: Some("2024-02-29T00:00:00".to_string()),
        ..manual_config()
    });
    let state = engine.state().await;
    assert_eq!(state.ring(RingKind::Day).unwrap().active_label(), Some("29"));
}

#[tokio::test]
async fn set_date_broadcasts_changes() {
    let engine = DialEngine::new(manual_config());
    let mut dial_rx = engine.subscribe_dial_events();

    let state = engine.set_date("2023-01-01T23:59:59").await.unwrap();
    assert_eq!(state.ring(RingKind::Hour).unwrap().active, Some(23));

    let first = dial_rx.recv().await.unwrap();
    assert!(matches!(first, DialEvent::TimestampApplied { .. }));
}

#[tokio::test]
async fn invalid_date_is_reported_and_clears() {
    let engine = DialEngine::new(manual_config());
    engine.set_date("2023-01-01T23:59:59").await.unwrap();
    let mut dial_rx = engine.subscribe_dial_events();

    let err = engine.set_date("half past nine").await.unwrap_err();
    assert!(matches!(err, Error::InvalidTimestamp { .. }));

    assert!(matches!(
        dial_rx.recv().await.unwrap(),
        DialEvent::InvalidTimestamp { .. }
    ));
    assert_eq!(dial_rx.recv().await.unwrap(), DialEvent::TimestampCleared);
    let state = engine.state().await;
    assert!(state.rings.iter().all(|ring| ring.active.is_none()));
}

#[tokio::test]
async fn render_listener_sees_every_changing_update() {
    let engine = DialEngine::new(manual_config());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = engine
        .on_render(move |state| {
            sink.lock().unwrap().push(state.timestamp);
        })
        .await;

    engine.set_date("2024-05-01T10:00:00").await.unwrap();
    engine.set_date("2024-05-01T10:00:00").await.unwrap();
    engine.set_date("2024-05-01T10:00:01").await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);

    assert!(engine.remove_render_listener(id).await);
    assert!(!engine.remove_render_listener(id).await);
    engine.set_date("2024-05-01T10:00:02").await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn one_shot_active_listener_is_removed_after_firing() {
    let engine = DialEngine::new(manual_config());
    let mut system_rx = engine.subscribe_system_events();
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let id = engine
        .on_active_change(
            RingKind::Minute,
            move |_, _| {
                counter.fetch_add(1, Ordering::Relaxed);
            },
            true,
        )
        .await;

    engine.set_date("2024-05-01T10:00:00").await.unwrap();
    engine.set_date("2024-05-01T10:01:00").await.unwrap();
    assert_eq!(fired.load(Ordering::Relaxed), 1);

    assert_eq!(
        system_rx.recv().await.unwrap(),
        SystemEvent::ListenerAdded { id }
    );
    assert_eq!(
        system_rx.recv().await.unwrap(),
        SystemEvent::ListenerRemoved { id }
    );
    assert!(!engine.remove_active_listener(id).await);
}

#[tokio::test]
async fn auto_advance_resyncs_to_the_wall_clock() {
    let engine = DialEngine::new(DialConfig {
        date: Some("2001-01-01T00:00:00".to_string()),
        resolution: ClockResolution::High,
        ..manual_config()
    });
    let mut system_rx = engine.subscribe_system_events();
    engine.set_auto_advance(true);
    assert!(engine.is_auto_advancing());

    engine
        .run_until(tokio::time::sleep(Duration::from_millis(600)))
        .await
        .unwrap();

    let state = engine.state().await;
    let year = state.fields.expect("fields").year;
    assert!(year > 2001);

    assert_eq!(
        system_rx.recv().await.unwrap(),
        SystemEvent::AutoAdvanceChanged { enabled: true }
    );
    assert!(matches!(
        system_rx.recv().await.unwrap(),
        SystemEvent::EngineStarted { .. }
    ));
    assert_eq!(system_rx.recv().await.unwrap(), SystemEvent::EngineShutdown);
}

#[tokio::test]
async fn starts_at_the_wall_clock_when_advancing() {
    let engine = DialEngine::new(DialConfig::default());
    let state = engine.state().await;

    let year = state.fields.expect("fields").year;
    assert!(year >= 2024);
    assert!(state.rings.iter().all(|ring| ring.active.is_some()));
}

#[tokio::test]
async fn invalid_configured_date_starts_inactive() {
    let engine = DialEngine::new(DialConfig {
        date: Some("the day after tomorrow".to_string()),
        ..manual_config()
    });
    let state = engine.state().await;

    assert_eq!(state.timestamp, None);
    for ring in &state.rings {
        assert_eq!(ring.active, None);
        assert_eq!(ring.rotation, None);
    }
}

#[tokio::test]
async fn very_fast_custom_resolution_still_resyncs() {
    let config = DialConfig::from_toml_str(
        r#"
        auto_advance = true
        date = "2001-01-01T00:00:00"

        [resolution.custom]
        ticks_per_second = 2000000000
        "#,
    )
    .unwrap();
    let engine = DialEngine::new(config);

    engine
        .run_until(tokio::time::sleep(Duration::from_millis(300)))
        .await
        .unwrap();

    let year = engine.state().await.fields.expect("fields").year;
    assert!(year > 2001);
}
