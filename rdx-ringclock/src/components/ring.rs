//! Rings as data: what a ring counts, how it is swept and how it is labelled.

use crate::calendar::DateFields;
use crate::common::{RingKind, SweepMode};
use crate::components::layout::{layout, rotation_offset};
use crate::components::marker::{ActiveMarker, MarkerChange};
use tracing::debug;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Item count used for the day ring before any timestamp is known.
const MAX_DAYS: usize = 31;

/// Where a ring's item count comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCount {
    Fixed(usize),
    /// Follows the month of the applied timestamp.
    DaysInMonth,
}

/// How item labels are produced from their index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// Two-digit numbers counting up from `first`.
    Padded { first: usize },
    Names(&'static [&'static str]),
}

impl LabelFormat {
    pub fn label(&self, index: usize) -> String {
        match self {
            LabelFormat::Padded { first } => format!("{:02}", first + index),
            LabelFormat::Names(names) => names
                .get(index)
                .map(|name| name.to_string())
                .unwrap_or_else(|| (index + 1).to_string()),
        }
    }
}

/// Everything needed to build and drive one ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpec {
    pub kind: RingKind,
    pub item_count: ItemCount,
    pub sweep: SweepMode,
    pub labels: LabelFormat,
}

impl RingSpec {
    /// The ring as the classic dial draws it.
    pub fn standard(kind: RingKind) -> Self {
        let (item_count, labels) = match kind {
            RingKind::Day => (ItemCount::DaysInMonth, LabelFormat::Padded { first: 1 }),
            RingKind::Month => (ItemCount::Fixed(12), LabelFormat::Names(&MONTHS)),
            RingKind::Weekday => (ItemCount::Fixed(7), LabelFormat::Names(&WEEKDAYS)),
            RingKind::Hour => (ItemCount::Fixed(24), LabelFormat::Padded { first: 0 }),
            RingKind::Minute | RingKind::Second => {
                (ItemCount::Fixed(60), LabelFormat::Padded { first: 0 })
            }
        };
        Self {
            kind,
            item_count,
            sweep: kind.default_sweep(),
            labels,
        }
    }

    pub fn with_sweep(mut self, sweep: SweepMode) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn item_count_for(&self, fields: Option<&DateFields>) -> usize {
        match self.item_count {
            ItemCount::Fixed(n) => n,
            ItemCount::DaysInMonth => fields
                .map(|f| f.days_in_month() as usize)
                .unwrap_or(MAX_DAYS),
        }
    }

    /// 0-based index of the item matching `fields`.
    pub fn active_index(&self, fields: &DateFields) -> Option<usize> {
        let value = match self.kind {
            RingKind::Day => fields.day.checked_sub(1)?,
            RingKind::Month => fields.month.checked_sub(1)?,
            RingKind::Weekday => fields.weekday,
            RingKind::Hour => fields.hour,
            RingKind::Minute => fields.minute,
            RingKind::Second => fields.second,
        };
        Some(value as usize)
    }
}

/// A labelled position within a ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub label: String,
    /// Fixed angle in degrees within the ring's own frame.
    pub angle: f64,
}

/// What applying a timestamp did to one ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingUpdate {
    /// New item count, if the items had to be rebuilt.
    pub rebuilt: Option<usize>,
    pub marker: Option<MarkerChange>,
}

/// A snapshot of one ring, ready for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RingState {
    pub kind: RingKind,
    pub sweep: SweepMode,
    pub items: Vec<Item>,
    /// Ring rotation in degrees, `None` while no item is active.
    pub rotation: Option<f64>,
    pub active: Option<usize>,
}

impl RingState {
    pub fn active_label(&self) -> Option<&str> {
        self.items.get(self.active?).map(|item| item.label.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Ring {
    spec: RingSpec,
    items: Vec<Item>,
    marker: ActiveMarker,
}

impl Ring {
    pub fn new(spec: RingSpec) -> Self {
        let mut ring = Self {
            spec,
            items: Vec::new(),
            marker: ActiveMarker::Inactive,
        };
        ring.rebuild(spec.item_count_for(None));
        ring
    }

    pub fn kind(&self) -> RingKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &RingSpec {
        &self.spec
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn active(&self) -> Option<usize> {
        self.marker.index()
    }

    pub fn rotation(&self) -> Option<f64> {
        rotation_offset(self.items.len(), self.spec.sweep, self.marker.index()?)
    }

    /// Brings the ring in line with `fields`, or clears its marker for `None`.
    pub fn apply(&mut self, fields: Option<&DateFields>) -> RingUpdate {
        let Some(fields) = fields else {
            return RingUpdate {
                rebuilt: None,
                marker: self.marker.clear(),
            };
        };

        // Rebuilding keeps the marker; `update` settles it against the new count.
        let count = self.spec.item_count_for(Some(fields));
        let rebuilt = (count != self.items.len()).then(|| {
            self.rebuild(count);
            count
        });
        let marker = self.marker.update(count, self.spec.active_index(fields));
        RingUpdate { rebuilt, marker }
    }

    pub fn state(&self) -> RingState {
        RingState {
            kind: self.spec.kind,
            sweep: self.spec.sweep,
            items: self.items.clone(),
            rotation: self.rotation(),
            active: self.active(),
        }
    }

    fn rebuild(&mut self, item_count: usize) {
        debug!("Laying out {} ring with {} items.", self.spec.kind, item_count);
        self.items = layout(item_count, self.spec.sweep)
            .into_iter()
            .enumerate()
            .map(|(i, angle)| Item {
                label: self.spec.labels.label(i),
                angle,
            })
            .collect();
    }
}
