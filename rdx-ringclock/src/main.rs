use anyhow::Result;
use ringclock::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the dial configuration, from a file if one was given.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DialConfig::load(config_path.as_deref())?;

    // 3. Create the DialEngine instance.
    let engine = DialEngine::new(config);

    // 4. Spawn concurrent tasks to listen to different event streams.
    spawn_event_listeners(&engine);

    // 5. Register the terminal renderer and a few ring listeners.
    register_listeners(&engine).await;

    // 6. Run the engine.
    engine.run().await?;

    Ok(())
}

/// Spawns several tasks, each subscribing to a different event stream from the engine.
fn spawn_event_listeners(engine: &DialEngine) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            info!("[SYSTEM] => {:?}", event);
        }
    });

    let mut dial_rx = engine.subscribe_dial_events();
    tokio::spawn(async move {
        while let Ok(event) = dial_rx.recv().await {
            match event {
                DialEvent::RingRebuilt { ring, item_count } => {
                    info!("[DIAL] => {} ring now has {} items", ring, item_count)
                }
                DialEvent::InvalidTimestamp { input, reason } => {
                    info!("[DIAL] => Rejected {:?}: {}", input, reason)
                }
                _ => {}
            }
        }
    });
}

/// Registers the renderer and ring listeners with the engine.
async fn register_listeners(engine: &DialEngine) {
    // --- Draw the dial, at most every half second ---
    let renderer = TextRenderer::default();
    let _render_id = engine
        .on_render_every(Duration::from_millis(500), move |state| {
            println!("{}", renderer.render(state));
        })
        .await;

    // --- Announce every new hour ---
    let _hour_id = engine
        .on_active_change(
            RingKind::Hour,
            |_, to| {
                if let Some(hour) = to {
                    info!("[HOUR] => It is now {:02}:00", hour);
                }
            },
            false,
        )
        .await;

    // --- Announce the first minute change, then stop listening ---
    let _minute_id = engine
        .on_active_change(
            RingKind::Minute,
            |from, to| info!("[MINUTE] => {:?} -> {:?} (one-shot)", from, to),
            true,
        )
        .await;
}
