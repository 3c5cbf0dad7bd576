//! Ledger of image ids already resolved during one scan.

use std::collections::HashSet;

/// Records which image ids have been dispatched for resolution.
///
/// Scoped to a single scan run; a fresh scan starts with a fresh cache.
#[derive(Debug, Default, Clone)]
pub struct ImageCache {
    seen: HashSet<String>,
}

impl ImageCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `image_id` has already been dispatched
    #[must_use]
    pub fn seen(&self, image_id: &str) -> bool {
        self.seen.contains(image_id)
    }

    /// Mark `image_id` as dispatched. Marking twice is a no-op.
    pub fn mark_seen(&mut self, image_id: &str) {
        if !self.seen.contains(image_id) {
            self.seen.insert(image_id.to_string());
        }
    }

    /// Check-and-mark in one step.
    ///
    /// Returns true exactly once per id: the caller that gets `true` owns
    /// resolving and classifying the image.
    pub fn claim(&mut self, image_id: &str) -> bool {
        if self.seen(image_id) {
            return false;
        }
        self.seen.insert(image_id.to_string())
    }

    /// Number of distinct ids seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been seen yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
