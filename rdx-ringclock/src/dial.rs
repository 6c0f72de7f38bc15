//! The dial: every ring driven from one timestamp.
//!
//! `Dial` is plain synchronous state. Each call runs to completion and reports
//! what changed as a list of [`DialEvent`]s; it never schedules anything on its
//! own. The [`DialEngine`](crate::engine::DialEngine) wraps it to add the
//! wall-clock tick and event broadcasting.

use crate::calendar::{DateFields, Timestamp};
use crate::common::RingKind;
use crate::components::ring::{Ring, RingSpec, RingState};
use crate::config::DialConfig;
use crate::error::Error;
use crate::events::DialEvent;
use chrono_tz::Tz;
use tracing::{debug, warn};

/// A renderer-ready snapshot of the whole dial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialState {
    pub timestamp: Option<Timestamp>,
    pub fields: Option<DateFields>,
    /// Outermost ring first.
    pub rings: Vec<RingState>,
}

impl DialState {
    pub fn ring(&self, kind: RingKind) -> Option<&RingState> {
        self.rings.iter().find(|ring| ring.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct Dial {
    rings: Vec<Ring>,
    timestamp: Option<Timestamp>,
}

impl Default for Dial {
    fn default() -> Self {
        Self::new(RingKind::ALL.map(RingSpec::standard))
    }
}

impl Dial {
    /// Builds a dial with no active items from the given rings.
    pub fn new(specs: impl IntoIterator<Item = RingSpec>) -> Self {
        Self {
            rings: specs.into_iter().map(Ring::new).collect(),
            timestamp: None,
        }
    }

    pub fn from_config(config: &DialConfig) -> Self {
        Self::new(config.ring_specs())
    }

    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn ring(&self, kind: RingKind) -> Option<&Ring> {
        self.rings.iter().find(|ring| ring.kind() == kind)
    }

    /// Drives every ring from `timestamp`. Applying the current timestamp
    /// again changes nothing.
    pub fn apply(&mut self, timestamp: Timestamp) -> Vec<DialEvent> {
        if self.timestamp == Some(timestamp) {
            return Vec::new();
        }
        self.timestamp = Some(timestamp);
        let fields = timestamp.fields();
        let mut events = vec![DialEvent::TimestampApplied { timestamp }];
        self.update_rings(Some(&fields), &mut events);
        debug!("Applied {} ({} changes).", timestamp, events.len() - 1);
        events
    }

    /// Drops the timestamp so that no ring has an active item.
    pub fn clear(&mut self) -> Vec<DialEvent> {
        let mut events = Vec::new();
        if self.timestamp.take().is_some() {
            events.push(DialEvent::TimestampCleared);
        }
        self.update_rings(None, &mut events);
        events
    }

    /// Applies `timestamp`, or clears the dial for `None`.
    pub fn update(&mut self, timestamp: Option<Timestamp>) -> Vec<DialEvent> {
        match timestamp {
            Some(timestamp) => self.apply(timestamp),
            None => self.clear(),
        }
    }

    /// Parses `input` in `zone` and applies it. Unusable input clears the
    /// dial instead; the failure is reported as an `InvalidTimestamp` event.
    pub fn set_date(&mut self, input: &str, zone: &Tz) -> Vec<DialEvent> {
        match Timestamp::parse(input, zone) {
            Ok(timestamp) => self.apply(timestamp),
            Err(e) => self.reject(&e),
        }
    }

    /// Falls back to the no-active state after bad input.
    pub fn reject(&mut self, error: &Error) -> Vec<DialEvent> {
        warn!("{}; clearing the dial.", error);
        let mut events = match error {
            Error::InvalidTimestamp { input, reason } => vec![DialEvent::InvalidTimestamp {
                input: input.clone(),
                reason: reason.clone(),
            }],
            Error::DegenerateRing { .. } => Vec::new(),
        };
        events.extend(self.clear());
        events
    }

    pub fn state(&self) -> DialState {
        DialState {
            timestamp: self.timestamp,
            fields: self.timestamp.map(|ts| ts.fields()),
            rings: self.rings.iter().map(Ring::state).collect(),
        }
    }

    fn update_rings(&mut self, fields: Option<&DateFields>, events: &mut Vec<DialEvent>) {
        for ring in self.rings.iter_mut() {
            let update = ring.apply(fields);
            if let Some(item_count) = update.rebuilt {
                events.push(DialEvent::RingRebuilt {
                    ring: ring.kind(),
                    item_count,
                });
            }
            if let Some(change) = update.marker {
                events.push(DialEvent::ActiveChanged {
                    ring: ring.kind(),
                    from: change.from,
                    to: change.to,
                });
            }
        }
    }
}
