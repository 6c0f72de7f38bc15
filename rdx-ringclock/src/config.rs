//! Defines all configuration structures for the Ringclock dial.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, layered with `RINGCLOCK_*` environment
//! variables through the `config` crate. This allows the tick speed, time zone
//! and ring layout to be defined outside the application code.

use crate::common::{RingKind, SweepMode};
use crate::components::ring::RingSpec;
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `RINGCLOCK_TIMEZONE`.
pub const ENV_PREFIX: &str = "RINGCLOCK";

/// Shortest tick period; faster custom resolutions are clamped to it.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// The top-level configuration for the dial and its engine.
#[derive(Debug, Clone, Deserialize)]
pub struct DialConfig {
    /// How often the wall-clock ticker fires.
    #[serde(default)]
    pub resolution: ClockResolution,

    /// Resync the dial to the wall clock on every tick.
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,

    /// The time zone the dial reads the wall clock in. Uses the string names
    /// from the IANA Time Zone Database (e.g., "Europe/Budapest").
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Timestamp text shown at startup.
    #[serde(default)]
    pub date: Option<String>,

    /// The rings, outermost first.
    #[serde(default = "default_rings")]
    pub rings: Vec<RingConfig>,
}

/// Defines the operational speed of the `SystemClock`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// 4 ticks per second. Keeps the second ring within a quarter second of
    /// the wall clock.
    High,
    /// 2 ticks per second.
    Medium,
    /// 1 tick per second.
    #[default]
    Low,
    /// A user-defined speed in ticks per second.
    Custom { ticks_per_second: u64 },
}

impl ClockResolution {
    /// Time between ticks, never shorter than [`MIN_TICK_PERIOD`].
    pub fn period(&self) -> Duration {
        let per_second: u64 = match self {
            ClockResolution::High => 4,
            ClockResolution::Medium => 2,
            ClockResolution::Low => 1,
            ClockResolution::Custom { ticks_per_second } => (*ticks_per_second).max(1),
        };
        let per_second = u32::try_from(per_second).unwrap_or(u32::MAX);
        (Duration::from_secs(1) / per_second).max(MIN_TICK_PERIOD)
    }
}

/// Defines a single ring of the dial.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RingConfig {
    pub kind: RingKind,
    /// Falls back to the ring kind's usual sweep.
    #[serde(default)]
    pub sweep: Option<SweepMode>,
}

impl RingConfig {
    pub fn spec(&self) -> RingSpec {
        RingSpec::standard(self.kind).with_sweep(self.sweep.unwrap_or(self.kind.default_sweep()))
    }
}

impl DialConfig {
    /// Loads the configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parses a TOML document, without environment overrides.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn ring_specs(&self) -> Vec<RingSpec> {
        self.rings.iter().map(RingConfig::spec).collect()
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            resolution: ClockResolution::default(),
            auto_advance: default_auto_advance(),
            timezone: default_timezone(),
            date: None,
            rings: default_rings(),
        }
    }
}

// --- Default value functions for serde ---

fn default_auto_advance() -> bool {
    true
}

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_rings() -> Vec<RingConfig> {
    RingKind::ALL
        .iter()
        .map(|&kind| RingConfig { kind, sweep: None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = DialConfig::from_toml_str("").unwrap();
        assert_eq!(config.resolution, ClockResolution::Low);
        assert!(config.auto_advance);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.rings.len(), 6);
        assert_eq!(config.date, None);
    }

    #[test]
    fn full_document() {
        let config = DialConfig::from_toml_str(
            r#"
            auto_advance = false
            timezone = "Europe/Budapest"
            date = "2024-02-29T00:00:00"

            [resolution.custom]
            ticks_per_second = 10

            [[rings]]
            kind = "month"

            [[rings]]
            kind = "hour"
            sweep = "partial270"
            "#,
        )
        .unwrap();
        assert!(!config.auto_advance);
        assert_eq!(config.timezone, chrono_tz::Europe::Budapest);
        assert_eq!(config.resolution.period(), Duration::from_millis(100));
        let specs = config.ring_specs();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].sweep, SweepMode::Partial270);
        assert_eq!(specs[1].sweep, SweepMode::Partial270);
    }

    #[test]
    fn resolution_periods() {
        assert_eq!(ClockResolution::Low.period(), Duration::from_secs(1));
        assert_eq!(ClockResolution::High.period(), Duration::from_millis(250));
        assert_eq!(
            ClockResolution::Custom { ticks_per_second: 0 }.period(),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn huge_custom_resolutions_clamp_to_the_minimum_period() {
        for ticks_per_second in [2_000_000_000, 4_294_967_296, u64::MAX] {
            let period = ClockResolution::Custom { ticks_per_second }.period();
            assert_eq!(period, MIN_TICK_PERIOD, "{ticks_per_second}");
        }
        assert_eq!(
            ClockResolution::Custom { ticks_per_second: 1000 }.period(),
            Duration::from_millis(1)
        );
        assert_eq!(
            ClockResolution::Custom { ticks_per_second: 400 }.period(),
            Duration::from_micros(2500)
        );
    }
}
