//! Tracks which single item of a ring is highlighted.

/// The highlighted item of one ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveMarker {
    /// No timestamp applied yet, or the last one was unusable.
    #[default]
    Inactive,
    Active(usize),
}

/// The difference a marker update made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerChange {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

impl ActiveMarker {
    pub fn index(&self) -> Option<usize> {
        match self {
            ActiveMarker::Inactive => None,
            ActiveMarker::Active(i) => Some(*i),
        }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.index() == Some(index)
    }

    /// Moves the marker to `index` within a ring of `item_count` items.
    ///
    /// An absent or out-of-range index leaves the ring without an active
    /// item. Returns `None` when the marker was already in the requested state.
    pub fn update(&mut self, item_count: usize, index: Option<usize>) -> Option<MarkerChange> {
        let next = match index {
            Some(i) if i < item_count => ActiveMarker::Active(i),
            _ => ActiveMarker::Inactive,
        };
        if next == *self {
            return None;
        }
        let change = MarkerChange {
            from: self.index(),
            to: next.index(),
        };
        *self = next;
        Some(change)
    }

    pub fn clear(&mut self) -> Option<MarkerChange> {
        self.update(0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        assert_eq!(ActiveMarker::default().index(), None);
    }

    #[test]
    fn moves_between_items() {
        let mut marker = ActiveMarker::default();
        assert_eq!(
            marker.update(12, Some(3)),
            Some(MarkerChange { from: None, to: Some(3) })
        );
        assert_eq!(
            marker.update(12, Some(4)),
            Some(MarkerChange { from: Some(3), to: Some(4) })
        );
        assert!(marker.is_active(4));
        assert!(!marker.is_active(3));
    }

    #[test]
    fn update_is_idempotent() {
        let mut once = ActiveMarker::default();
        once.update(60, Some(42));
        let mut twice = once;
        assert_eq!(twice.update(60, Some(42)), None);
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_clears() {
        let mut marker = ActiveMarker::Active(5);
        assert_eq!(
            marker.update(7, Some(7)),
            Some(MarkerChange { from: Some(5), to: None })
        );
        assert_eq!(marker, ActiveMarker::Inactive);
        assert_eq!(marker.update(0, Some(0)), None);
    }

    #[test]
    fn clear_is_noop_when_inactive() {
        let mut marker = ActiveMarker::Inactive;
        assert_eq!(marker.clear(), None);
    }
}
