//! The engine that keeps a dial in step with the wall clock and tells the
//! outside world about it.

use crate::calendar::Timestamp;
use crate::common::{ListenerId, RingKind};
use crate::components::watcher::{ActiveWatcher, RenderWatcher};
use crate::config::DialConfig;
use crate::dial::{Dial, DialState};
use crate::error::Error;
use crate::events::{DialEvent, SystemEvent};
use crate::time::{SystemClock, TickEvent};
use chrono_tz::Tz;
use slotmap::SlotMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, trace, warn};

/// The main Ringclock engine.
///
/// This struct is the central point of control. It holds the dial and its
/// configuration, manages the registered listeners, and turns wall-clock ticks
/// into dial updates while auto-advance is on. The `DialEngine` is designed to
/// be cloned and shared across tasks, providing a handle to the running
/// instance.
///
/// Every update, whether from a tick or from [`set_date`](Self::set_date),
/// holds the dial's write lock until its events have been broadcast and its
/// listeners have run, so updates never interleave.
#[derive(Clone)]
pub struct DialEngine {
    config: Arc<DialConfig>,
    dial: Arc<RwLock<Dial>>,
    auto_advance: Arc<AtomicBool>,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    dial_event_sender: broadcast::Sender<DialEvent>,
    render_watchers: Arc<RwLock<SlotMap<ListenerId, RenderWatcher>>>,
    active_watchers: Arc<RwLock<SlotMap<ListenerId, ActiveWatcher>>>,
}

// Core implementation block for internal logic.
impl DialEngine {
    /// Creates a new `DialEngine` with the given configuration.
    ///
    /// The dial starts at the configured `date` if there is one, at the wall
    /// clock if auto-advance is on, and with no active items otherwise.
    pub fn new(config: DialConfig) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (tick_sender, _) = broadcast::channel(64);
        let (system_event_sender, _) = broadcast::channel(64);
        let (dial_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        let mut dial = Dial::from_config(&config);
        match &config.date {
            Some(date) => {
                dial.set_date(date, &config.timezone);
            }
            None if config.auto_advance => {
                dial.apply(Timestamp::now(&config.timezone));
            }
            None => {}
        }

        Self {
            auto_advance: Arc::new(AtomicBool::new(config.auto_advance)),
            config: Arc::new(config),
            dial: Arc::new(RwLock::new(dial)),
            tick_sender,
            system_event_sender,
            dial_event_sender,
            render_watchers: Arc::new(RwLock::new(SlotMap::with_key())),
            active_watchers: Arc::new(RwLock::new(SlotMap::with_key())),
        }
    }

    /// Runs the engine's main loop until a shutdown signal is received.
    ///
    /// This method will:
    /// 1. Spawn the `SystemClock` task.
    /// 2. Spawn the dispatcher task that resyncs the dial on each tick.
    /// 3. Wait for a Ctrl+C signal to initiate a graceful shutdown.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut signal = Ok(());
        self.run_until(async {
            signal = tokio::signal::ctrl_c().await;
        })
        .await?;
        Ok(signal?)
    }

    /// Like [`run`](Self::run), but stops when `shutdown` completes.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("DialEngine starting up...");
        let (shutdown_tx, _) = broadcast::channel(1);

        let tick_rx = self.tick_sender.subscribe();
        let clock = SystemClock::new(self.config.resolution.clone(), self.tick_sender.clone());
        let clock_shutdown_rx = shutdown_tx.subscribe();
        let clock_task = tokio::spawn(async move { clock.run(clock_shutdown_rx).await });

        let dispatcher = self.clone();
        let dispatcher_shutdown_rx = shutdown_tx.subscribe();
        let dispatcher_task = tokio::spawn(async move {
            dispatcher
                .dispatcher_loop(tick_rx, dispatcher_shutdown_rx)
                .await
        });

        info!(
            "Engine running at {:?} in {}.",
            self.config.resolution, self.config.timezone
        );
        shutdown.await;

        info!("Shutdown signal received. Broadcasting to all tasks...");
        if shutdown_tx.send(()).is_err() {
            error!("Failed to send shutdown signal. Some tasks may not terminate gracefully.");
        }
        let (clock_result, dispatcher_result) = tokio::join!(clock_task, dispatcher_task);
        clock_result?;
        dispatcher_result?;
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("DialEngine has shut down.");
        Ok(())
    }

    #[doc(hidden)]
    async fn dispatcher_loop(
        self,
        mut tick_rx: broadcast::Receiver<Arc<TickEvent>>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: tokio::time::Instant::now(),
            })
            .ok();
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                tick = tick_rx.recv() => match tick {
                    Ok(tick) => {
                        trace!("Tick #{} received.", tick.tick_count);
                        if self.auto_advance.load(Ordering::Relaxed) {
                            self.sync_now().await;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => warn!("Dispatcher skipped {} ticks.", missed),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    /// Runs one update under the write lock and publishes what it changed.
    #[doc(hidden)]
    async fn commit(&self, update: impl FnOnce(&mut Dial) -> Vec<DialEvent>) -> DialState {
        let mut dial = self.dial.write().await;
        let events = update(&mut *dial);
        let state = dial.state();
        if !events.is_empty() {
            trace!("Publishing {} dial events.", events.len());
            for event in &events {
                self.dial_event_sender.send(event.clone()).ok();
            }
            self.process_active_watchers(&events).await;
            self.process_render_watchers(&state).await;
        }
        state
    }

    #[doc(hidden)]
    async fn process_active_watchers(&self, events: &[DialEvent]) {
        let mut active_watchers = self.active_watchers.write().await;
        let mut fired_one_shots = Vec::new();
        for (id, watcher) in active_watchers.iter_mut() {
            let fired = events
                .iter()
                .filter(|event| watcher.check_and_fire(event))
                .count()
                > 0;
            if fired && watcher.is_one_shot {
                fired_one_shots.push(id);
            }
        }
        for id in fired_one_shots {
            if active_watchers.remove(id).is_some() {
                self.system_event_sender
                    .send(SystemEvent::ListenerRemoved { id })
                    .ok();
            }
        }
    }

    #[doc(hidden)]
    async fn process_render_watchers(&self, state: &DialState) {
        let mut render_watchers = self.render_watchers.write().await;
        for (_id, watcher) in render_watchers.iter_mut() {
            watcher.process_update(state);
        }
    }
}

// Public API implementation block.
impl DialEngine {
    /// Parses `input` and shows it on the dial.
    ///
    /// Unusable input (including empty text) clears every ring's active item
    /// before the error is returned. The error is informational: the dial is
    /// already in its safe state and an `InvalidTimestamp` event has been
    /// broadcast.
    pub async fn set_date(&self, input: &str) -> Result<DialState, Error> {
        let mut failure = None;
        let zone = self.config.timezone;
        let state = self
            .commit(|dial| match Timestamp::parse(input, &zone) {
                Ok(timestamp) => dial.apply(timestamp),
                Err(e) => {
                    let events = dial.reject(&e);
                    failure = Some(e);
                    events
                }
            })
            .await;
        match failure {
            Some(e) => Err(e),
            None => Ok(state),
        }
    }

    /// Shows `timestamp`, or clears the dial for `None`.
    pub async fn set_timestamp(&self, timestamp: Option<Timestamp>) -> DialState {
        self.commit(|dial| dial.update(timestamp)).await
    }

    /// Resyncs the dial to the wall clock once.
    pub async fn sync_now(&self) -> DialState {
        let now = Timestamp::now(&self.config.timezone);
        self.commit(|dial| dial.apply(now)).await
    }

    /// Switches wall-clock resyncing on every tick on or off.
    pub fn set_auto_advance(&self, enabled: bool) {
        if self.auto_advance.swap(enabled, Ordering::Relaxed) != enabled {
            debug!("Auto-advance {}.", if enabled { "enabled" } else { "disabled" });
            self.system_event_sender
                .send(SystemEvent::AutoAdvanceChanged { enabled })
                .ok();
        }
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advance.load(Ordering::Relaxed)
    }

    pub fn timezone(&self) -> Tz {
        self.config.timezone
    }

    /// A snapshot of the dial as it is now.
    pub async fn state(&self) -> DialState {
        self.dial.read().await.state()
    }

    /// Registers a renderer that receives the dial state after every update
    /// that changed something.
    ///
    /// # Returns
    /// A `ListenerId` which can be used to later remove this renderer.
    pub async fn on_render(
        &self,
        render: impl FnMut(&DialState) + Send + Sync + 'static,
    ) -> ListenerId {
        self.on_render_every(Duration::ZERO, render).await
    }

    /// Registers a renderer that runs at most once per `min_period`.
    /// Updates arriving sooner are skipped, not queued.
    pub async fn on_render_every(
        &self,
        min_period: Duration,
        render: impl FnMut(&DialState) + Send + Sync + 'static,
    ) -> ListenerId {
        let watcher = RenderWatcher::new(min_period, Box::new(render));
        let id = self.render_watchers.write().await.insert(watcher);
        self.system_event_sender
            .send(SystemEvent::ListenerAdded { id })
            .ok();
        id
    }

    /// Registers a closure that runs whenever `ring`'s active item moves.
    ///
    /// # Arguments
    /// * `ring` - The ring to watch.
    /// * `on_change` - Receives the previous and the new active index.
    /// * `is_one_shot` - If true, the listener is removed after firing once.
    pub async fn on_active_change(
        &self,
        ring: RingKind,
        on_change: impl FnMut(Option<usize>, Option<usize>) + Send + Sync + 'static,
        is_one_shot: bool,
    ) -> ListenerId {
        let watcher = ActiveWatcher::new(ring, Box::new(on_change), is_one_shot);
        let id = self.active_watchers.write().await.insert(watcher);
        self.system_event_sender
            .send(SystemEvent::ListenerAdded { id })
            .ok();
        id
    }

    /// Removes a render listener from the engine.
    ///
    /// Returns `true` if the listener was found and removed.
    pub async fn remove_render_listener(&self, id: ListenerId) -> bool {
        let was_removed = self.render_watchers.write().await.remove(id).is_some();
        if was_removed {
            self.system_event_sender
                .send(SystemEvent::ListenerRemoved { id })
                .ok();
        }
        was_removed
    }

    /// Removes an active-change listener from the engine.
    ///
    /// Returns `true` if the listener was found and removed.
    pub async fn remove_active_listener(&self, id: ListenerId) -> bool {
        let was_removed = self.active_watchers.write().await.remove(id).is_some();
        if was_removed {
            self.system_event_sender
                .send(SystemEvent::ListenerRemoved { id })
                .ok();
        }
        was_removed
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }

    /// Subscribes to the `DialEvent` stream.
    pub fn subscribe_dial_events(&self) -> broadcast::Receiver<DialEvent> {
        self.dial_event_sender.subscribe()
    }

    /// Subscribes to the raw `TickEvent` stream.
    pub fn subscribe_tick_events(&self) -> broadcast::Receiver<Arc<TickEvent>> {
        self.tick_sender.subscribe()
    }
}
