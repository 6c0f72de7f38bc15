//! Defines watchers that react to completed dial updates.

use crate::common::RingKind;
use crate::dial::DialState;
use crate::events::DialEvent;
use std::time::{Duration, Instant};

/// A closure that projects dial state somewhere, typically onto a screen.
pub type RenderFn = Box<dyn FnMut(&DialState) + Send + Sync>;

/// A closure told the previous and new active index of one ring.
pub type ActiveChangeFn = Box<dyn FnMut(Option<usize>, Option<usize>) + Send + Sync>;

/// Hands every completed update to a renderer, at most once per `min_period`.
#[doc(hidden)]
pub(crate) struct RenderWatcher {
    pub min_period: Duration,
    pub last_fired: Option<Instant>,
    pub render: RenderFn,
}

impl RenderWatcher {
    /// Creates a new `RenderWatcher`.
    pub(crate) fn new(min_period: Duration, render: RenderFn) -> Self {
        Self {
            min_period,
            last_fired: None,
            render,
        }
    }

    /// Renders `state` unless the previous render was too recent.
    /// Returns `true` if the renderer ran.
    pub(crate) fn process_update(&mut self, state: &DialState) -> bool {
        let due = self
            .last_fired
            .map_or(true, |last| last.elapsed() >= self.min_period);
        if due {
            (self.render)(state);
            self.last_fired = Some(Instant::now());
        }
        due
    }
}

/// Watches one ring for its active item moving.
#[doc(hidden)]
pub(crate) struct ActiveWatcher {
    pub ring: RingKind,
    pub on_change: ActiveChangeFn,
    pub is_one_shot: bool,
}

impl ActiveWatcher {
    /// Creates a new `ActiveWatcher`.
    pub(crate) fn new(ring: RingKind, on_change: ActiveChangeFn, is_one_shot: bool) -> Self {
        Self {
            ring,
            on_change,
            is_one_shot,
        }
    }

    /// Runs the closure if `event` moved this watcher's ring.
    /// Returns `true` if it fired.
    pub(crate) fn check_and_fire(&mut self, event: &DialEvent) -> bool {
        match event {
            DialEvent::ActiveChanged { ring, from, to } if *ring == self.ring => {
                (self.on_change)(*from, *to);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn render_watcher_throttles() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = count.clone();
        let mut watcher = RenderWatcher::new(
            Duration::from_secs(3600),
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        let state = DialState::default();
        assert!(watcher.process_update(&state));
        assert!(!watcher.process_update(&state));
        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn active_watcher_filters_by_ring() {
        let seen = Arc::new(AtomicU32::new(0));
        let sink = seen.clone();
        let mut watcher = ActiveWatcher::new(
            RingKind::Minute,
            Box::new(move |_, to| {
                sink.store(to.unwrap_or(99) as u32, Ordering::Relaxed);
            }),
            false,
        );
        let other = DialEvent::ActiveChanged {
            ring: RingKind::Second,
            from: None,
            to: Some(1),
        };
        let mine = DialEvent::ActiveChanged {
            ring: RingKind::Minute,
            from: Some(1),
            to: Some(2),
        };
        assert!(!watcher.check_and_fire(&other));
        assert!(watcher.check_and_fire(&mine));
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }
}
