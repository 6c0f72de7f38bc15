//! Ring geometry.
//!
//! Items sit at fixed angles in the ring's own frame, evenly spaced over the
//! sweep. Turning the whole ring by [`rotation_offset`] brings the active item
//! to the reference position at 0° (the top of the dial). A renderer that
//! counter-rotates each label by its own fixed angle keeps labels upright while
//! only the ring housing turns.

use crate::common::SweepMode;
use crate::error::Error;

/// Width of one item's slice of the sweep.
pub fn slice_width(item_count: usize, sweep: SweepMode) -> Result<f64, Error> {
    if item_count == 0 {
        return Err(Error::DegenerateRing { ring: None });
    }
    Ok(sweep.degrees() / item_count as f64)
}

/// Fixed angle of every item, in item order. Empty for a ring with no items.
pub fn layout(item_count: usize, sweep: SweepMode) -> Vec<f64> {
    let Ok(slice) = slice_width(item_count, sweep) else {
        return Vec::new();
    };
    let start = -sweep.degrees() / 2.0 + slice / 2.0;
    (0..item_count).map(|i| start + i as f64 * slice).collect()
}

/// Rotation that brings item `active_index` to the reference position.
/// `None` for a ring with no items.
pub fn rotation_offset(item_count: usize, sweep: SweepMode, active_index: usize) -> Option<f64> {
    let slice = slice_width(item_count, sweep).ok()?;
    Some(sweep.degrees() / 2.0 - slice / 2.0 - active_index as f64 * slice)
}
