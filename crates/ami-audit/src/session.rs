//! Mutable state of one scan run: the dedup cache and the category buckets.

use std::collections::BTreeMap;

use ami_core::{Category, ImageRecord};

use crate::cache::ImageCache;
use crate::report::Report;

/// Classified records, one map per category, keyed by image id.
#[derive(Debug, Default, Clone)]
pub struct Buckets {
    verified: BTreeMap<String, ImageRecord>,
    private: BTreeMap<String, ImageRecord>,
    unknown: BTreeMap<String, ImageRecord>,
    unverified: BTreeMap<String, ImageRecord>,
}

impl Buckets {
    /// Records in `category`, ordered by image id
    #[must_use]
    pub const fn bucket(&self, category: Category) -> &BTreeMap<String, ImageRecord> {
        match category {
            Category::Verified => &self.verified,
            Category::Private => &self.private,
            Category::Unknown => &self.unknown,
            Category::Unverified => &self.unverified,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut BTreeMap<String, ImageRecord> {
        match category {
            Category::Verified => &mut self.verified,
            Category::Private => &mut self.private,
            Category::Unknown => &mut self.unknown,
            Category::Unverified => &mut self.unverified,
        }
    }

    /// Total records across all buckets
    #[must_use]
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.bucket(*c).len()).sum()
    }

    /// Returns true if nothing has been filed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Category an image was filed under, if any
    #[must_use]
    pub fn category_of(&self, image_id: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.bucket(*c).contains_key(image_id))
    }
}

/// State scoped to one scan invocation.
///
/// Constructed per run and consumed into a [`Report`] at the end, so nothing
/// leaks between runs.
#[derive(Debug, Default)]
pub struct ScanSession {
    cache: ImageCache,
    buckets: Buckets,
    total_instances: usize,
    skipped_regions: Vec<String>,
}

impl ScanSession {
    /// Start an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count instance observations from a listed region
    pub fn record_instances(&mut self, count: usize) {
        self.total_instances += count;
    }

    /// Remember a region whose work was abandoned
    pub fn record_skipped(&mut self, region: &str) {
        self.skipped_regions.push(region.to_string());
    }

    /// Claim `image_id` for resolution; see [`ImageCache::claim`]
    pub fn claim(&mut self, image_id: &str) -> bool {
        self.cache.claim(image_id)
    }

    /// File a classified record.
    ///
    /// Records are immutable once filed: a second record for the same id is
    /// dropped and `false` is returned.
    pub fn file(&mut self, record: ImageRecord) -> bool {
        if self.buckets.category_of(&record.id).is_some() {
            return false;
        }
        self.cache.mark_seen(&record.id);
        self.buckets
            .bucket_mut(record.category)
            .insert(record.id.clone(), record);
        true
    }

    /// Read-only view of the buckets
    #[must_use]
    pub const fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Instance observations so far
    #[must_use]
    pub const fn total_instances(&self) -> usize {
        self.total_instances
    }

    /// Finish the run
    #[must_use]
    pub fn into_report(mut self) -> Report {
        self.skipped_regions.sort();
        Report::from_buckets(&self.buckets, self.total_instances, self.skipped_regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filed_records_are_immutable() {
        let mut session = ScanSession::new();
        assert!(session.claim("ami-1"));
        assert!(session.file(ImageRecord::unresolved("ami-1", "us-east-1")));

        let mut replacement = ImageRecord::unresolved("ami-1", "eu-west-1");
        replacement.category = Category::Verified;
        assert!(!session.file(replacement));

        assert_eq!(session.buckets().category_of("ami-1"), Some(Category::Unknown));
        assert_eq!(session.buckets().len(), 1);
        assert_eq!(
            session.buckets().bucket(Category::Unknown)["ami-1"].region,
            "us-east-1"
        );
    }

    #[test]
    fn filing_marks_the_cache() {
        let mut session = ScanSession::new();
        session.file(ImageRecord::unresolved("ami-9", "us-east-1"));
        assert!(!session.claim("ami-9"));
    }

    #[test]
    fn report_carries_totals() {
        let mut session = ScanSession::new();
        session.record_instances(4);
        session.record_skipped("me-south-1");
        session.record_skipped("af-south-1");
        session.claim("ami-1");
        session.file(ImageRecord::unresolved("ami-1", "us-east-1"));

        let report = session.into_report();
        assert_eq!(report.summary.total_instances, 4);
        assert_eq!(report.summary.total_images, 1);
        assert_eq!(report.skipped_regions, ["af-south-1", "me-south-1"]);
    }
}
