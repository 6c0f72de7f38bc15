//! # Ringclock
//!
//! The core of a concentric ring dial clock.
//!
//! Ringclock turns a wall-clock timestamp into the state of six rings (day of
//! month, month, day of week, hour, minute and second). Each ring reports
//! where its items sit, how far the ring is turned and which item is active.
//! Drawing is left to a renderer consuming that state.
//!
//! ## Core Concepts
//!
//! - **Dial**: Plain synchronous state. Apply a `Timestamp`, get back the
//!   `DialEvent`s describing what changed, and a `DialState` snapshot.
//! - **Rings as data**: A `RingSpec` says where a ring's item count comes from,
//!   whether it sweeps 270° or 360°, and how its items are labelled.
//! - **Engine**: `DialEngine` owns the wall-clock ticker, pushes timestamps
//!   into the dial while auto-advance is on, and broadcasts what changed.
//! - **Configuration-Driven**: Tick speed, time zone, initial date and ring
//!   layout come from a `DialConfig`, often loaded from a TOML file.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ringclock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Create a default configuration.
//!     let config = DialConfig::default();
//!
//!     // 2. Create the engine.
//!     let engine = DialEngine::new(config);
//!
//!     // 3. Draw the dial whenever it changes.
//!     let renderer = TextRenderer::default();
//!     let _listener_id = engine
//!         .on_render(move |state| print!("{}", renderer.render(state)))
//!         .await;
//!
//!     // 4. Run the engine. It will shut down on Ctrl+C.
//!     engine.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Ring Dial";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod calendar;
pub mod common;
pub mod components;
pub mod config;
pub mod dial;
pub mod engine;
pub mod error;
pub mod events;
pub mod render;
pub mod time;

pub use error::Error;

/// A prelude module for easy importing of the most common Ringclock types.
pub mod prelude {
    pub use crate::calendar::{days_in_month, DateFields, Timestamp};
    pub use crate::common::{ListenerId, RingKind, SweepMode};
    pub use crate::components::ring::{RingSpec, RingState};
    pub use crate::config::{ClockResolution, DialConfig};
    pub use crate::dial::{Dial, DialState};
    pub use crate::engine::DialEngine;
    pub use crate::error::Error;
    pub use crate::events::{DialEvent, SystemEvent};
    pub use crate::render::{Renderer, TextRenderer};
}
