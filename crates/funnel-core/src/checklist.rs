//! # Checklist Module
//!
//! The confirmations a salesperson ticks while recording a contact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Item identifier → completion flag.
///
/// An item that is absent counts the same as one explicitly set to `false`.
/// Uses `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(BTreeMap<String, bool>);

impl Checklist {
    /// Create an empty checklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a checklist from the list of ticked items.
    ///
    /// This is the shape a submitted form produces: only checked boxes are
    /// sent, and each one means `true`.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(|item| (item.into(), true)).collect())
    }

    /// Set an item's flag, returning the checklist for chaining.
    #[must_use]
    pub fn with(mut self, item: impl Into<String>, done: bool) -> Self {
        self.set(item, done);
        self
    }

    pub fn set(&mut self, item: impl Into<String>, done: bool) {
        self.0.insert(item.into(), done);
    }

    /// Drop an item entirely.
    pub fn remove(&mut self, item: &str) -> Option<bool> {
        self.0.remove(item)
    }

    /// Whether the item is present and `true`.
    #[must_use]
    pub fn is_done(&self, item: &str) -> bool {
        self.0.get(item).copied().unwrap_or(false)
    }

    /// Items flagged `true`, in sorted order.
    pub fn ticked(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, done)| **done)
            .map(|(item, _)| item.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, bool>> for Checklist {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for Checklist {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_items_are_not_done() {
        let checklist = Checklist::new().with("attempt_made", true);
        assert!(checklist.is_done("attempt_made"));
        assert!(!checklist.is_done("channel_validated"));
    }

    #[test]
    fn false_items_are_not_done() {
        let checklist = Checklist::new().with("attempt_made", false);
        assert!(!checklist.is_done("attempt_made"));
        assert_eq!(checklist.len(), 1);
    }

    #[test]
    fn from_items_ticks_everything() {
        let checklist = Checklist::from_items(["b", "a"]);
        let ticked: Vec<_> = checklist.ticked().collect();
        assert_eq!(ticked, vec!["a", "b"]);
    }

    #[test]
    fn ticked_skips_false_entries() {
        let checklist: Checklist = [("a", true), ("b", false), ("c", true)].into_iter().collect();
        let ticked: Vec<_> = checklist.ticked().collect();
        assert_eq!(ticked, vec!["a", "c"]);
    }

    #[test]
    fn deserializes_from_plain_object() {
        let checklist: Option<Checklist> =
            serde_json::from_str(r#"{"attempt_made": true, "result_logged": false}"#).ok();
        let checklist = checklist.unwrap_or_default();
        assert!(checklist.is_done("attempt_made"));
        assert!(!checklist.is_done("result_logged"));
    }
}
