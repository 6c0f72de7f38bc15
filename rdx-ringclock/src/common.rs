//! Contains common, primitive types shared across the dial.
//!
//! This module defines the identifiers for rings and listeners, and the sweep
//! modes a ring can be laid out with. Using distinct types keeps ring handling
//! type safe across the layout, marker and engine layers.

use serde::Deserialize;
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Uniquely and safely identifies a registered listener within the engine.
    ///
    /// This key is returned when a render or active-change listener is added.
    /// It is never reused, so a stale handle cannot remove a newer listener.
    pub struct ListenerId;
}

/// Identifies one concentric ring of the dial, and the date field it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingKind {
    Day,
    Month,
    Weekday,
    Hour,
    Minute,
    Second,
}

impl RingKind {
    /// All ring kinds, outermost first.
    pub const ALL: [RingKind; 6] = [
        RingKind::Day,
        RingKind::Month,
        RingKind::Weekday,
        RingKind::Hour,
        RingKind::Minute,
        RingKind::Second,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RingKind::Day => "day",
            RingKind::Month => "month",
            RingKind::Weekday => "weekday",
            RingKind::Hour => "hour",
            RingKind::Minute => "minute",
            RingKind::Second => "second",
        }
    }

    /// The sweep this ring uses unless configured otherwise.
    pub fn default_sweep(self) -> SweepMode {
        match self {
            RingKind::Day | RingKind::Month | RingKind::Weekday => SweepMode::Partial270,
            RingKind::Hour | RingKind::Minute | RingKind::Second => SweepMode::Full360,
        }
    }
}

impl fmt::Display for RingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for RingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(RingKind::Day),
            "month" => Ok(RingKind::Month),
            "weekday" | "dow" => Ok(RingKind::Weekday),
            "hour" => Ok(RingKind::Hour),
            "minute" | "min" => Ok(RingKind::Minute),
            "second" | "sec" => Ok(RingKind::Second),
            other => Err(format!("unknown ring '{other}'")),
        }
    }
}

/// The angular extent a ring's items are distributed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// A 270° arc, leaving the bottom quarter of the ring open.
    Partial270,
    /// The complete circle.
    Full360,
}

impl SweepMode {
    pub fn degrees(self) -> f64 {
        match self {
            SweepMode::Partial270 => 270.0,
            SweepMode::Full360 => 360.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_kind_parses_aliases() {
        assert_eq!("dow".parse::<RingKind>(), Ok(RingKind::Weekday));
        assert_eq!("Sec".parse::<RingKind>(), Ok(RingKind::Second));
        assert!("year".parse::<RingKind>().is_err());
    }

    #[test]
    fn default_sweeps() {
        assert_eq!(RingKind::Month.default_sweep(), SweepMode::Partial270);
        assert_eq!(RingKind::Minute.default_sweep(), SweepMode::Full360);
        assert_eq!(SweepMode::Partial270.degrees(), 270.0);
    }
}
