//! Dirty-field tracking for endpoint models.

use std::collections::BTreeSet;

/// Names of the fields modified since the last load or successful write.
///
/// Every write marks its field, even when the value did not change: a
/// repeated write is a deliberate request to send that field again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    dirty: BTreeSet<&'static str>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `field` as changed. Idempotent.
    pub fn record_change(&mut self, field: &'static str) {
        self.dirty.insert(field);
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Snapshot of the dirty set, in name order.
    pub fn dirty_fields(&self) -> BTreeSet<&'static str> {
        self.dirty.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.dirty.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// Clear the dirty set after a successful synchronisation.
    pub fn reset(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_change_is_idempotent() {
        let mut tracker = ChangeTracker::new();
        tracker.record_change("firstName");
        tracker.record_change("firstName");

        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_dirty("firstName"));
        assert!(!tracker.is_dirty("lastName"));
    }

    #[test]
    fn test_reset_clears() {
        let mut tracker = ChangeTracker::new();
        tracker.record_change("a");
        tracker.record_change("b");
        assert_eq!(tracker.dirty_fields().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);

        tracker.reset();
        assert!(tracker.is_empty());
    }
}
