//! The wall-clock ticker that drives auto-advance.
//!
//! `SystemClock` owns the only timer in the system. It knows nothing about the
//! dial: it broadcasts `TickEvent`s and the engine decides what to do with
//! them.

use crate::config::ClockResolution;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// One beat of the `SystemClock`.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Ticks since the clock started, starting at 1.
    pub tick_count: u64,
    pub timestamp: Instant,
}

/// Broadcasts a `TickEvent` once per period of its resolution.
pub struct SystemClock {
    resolution: ClockResolution,
    tick_sender: broadcast::Sender<Arc<TickEvent>>,
}

impl SystemClock {
    pub fn new(
        resolution: ClockResolution,
        tick_sender: broadcast::Sender<Arc<TickEvent>>,
    ) -> Self {
        Self {
            resolution,
            tick_sender,
        }
    }

    /// Ticks until a shutdown signal arrives.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut ticker = interval(self.resolution.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick_count = 0u64;
        debug!("SystemClock ticking every {:?}.", self.resolution.period());
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                instant = ticker.tick() => {
                    tick_count += 1;
                    trace!("Tick #{}.", tick_count);
                    self.tick_sender
                        .send(Arc::new(TickEvent { tick_count, timestamp: instant }))
                        .ok();
                }
            }
        }
        debug!("SystemClock stopped after {} ticks.", tick_count);
    }
}
