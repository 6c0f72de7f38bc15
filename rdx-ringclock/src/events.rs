//! Defines all public event types broadcast by the Ringclock engine.
//!
//! This module acts as the public API for the engine's event system. Listeners
//! subscribe to these specific, strongly-typed events to follow the dial.

use crate::calendar::Timestamp;
use crate::common::{ListenerId, RingKind};
use tokio::time::Instant;

/// Events related to the lifecycle and state of the engine itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// Fired once when the engine's `run` loop begins.
    EngineStarted { timestamp: Instant },
    /// Fired once when the engine's `run` loop is about to exit.
    EngineShutdown,
    /// Fired when a new listener is successfully added to the engine.
    ListenerAdded { id: ListenerId },
    /// Fired when a listener is removed from the engine.
    ListenerRemoved { id: ListenerId },
    /// Fired when wall-clock resyncing is switched on or off.
    AutoAdvanceChanged { enabled: bool },
}

/// Changes to the dial produced by a single update.
///
/// Events from one update are broadcast together, in ring order, after the
/// update has completed.
#[derive(Debug, Clone, PartialEq)]
pub enum DialEvent {
    /// A new timestamp now drives the rings.
    TimestampApplied { timestamp: Timestamp },
    /// The dial lost its timestamp and shows no active items.
    TimestampCleared,
    /// Input could not be turned into a timestamp. Always followed by
    /// `TimestampCleared` if the dial had one.
    InvalidTimestamp { input: String, reason: String },
    /// A ring's items were laid out again for a new item count.
    RingRebuilt { ring: RingKind, item_count: usize },
    /// A ring's highlighted item moved.
    ActiveChanged {
        ring: RingKind,
        from: Option<usize>,
        to: Option<usize>,
    },
}
