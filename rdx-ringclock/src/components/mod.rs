//! Contains the building blocks the dial is assembled from.
//!
//! This module provides the ring geometry (`layout`), the active-item state
//! machine (`marker`), the rings themselves (`ring`) and the watchers that
//! react to dial updates (`watcher`). The `DialEngine` manages collections of
//! these components to drive the clock.

pub mod layout;
pub mod marker;
pub mod ring;
pub mod watcher;
