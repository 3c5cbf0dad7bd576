//! Aggregation of the final bucket state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ami_core::{Category, ImageRecord};

use crate::session::Buckets;

/// Tallies for one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Instance observations across all scanned regions
    pub total_instances: usize,
    /// Distinct images classified
    pub total_images: usize,
    /// Images filed as Private
    pub private: usize,
    /// Images filed as Verified
    pub verified: usize,
    /// Images filed as Unknown
    pub unknown: usize,
    /// Images filed as Unverified
    pub unverified: usize,
}

impl AuditSummary {
    /// Count for one category
    #[must_use]
    pub const fn count(&self, category: Category) -> usize {
        match category {
            Category::Verified => self.verified,
            Category::Private => self.private,
            Category::Unknown => self.unknown,
            Category::Unverified => self.unverified,
        }
    }

    /// Category counts add up to the distinct images, which never exceed
    /// the instance observations
    #[must_use]
    pub const fn reconciles(&self) -> bool {
        self.private + self.verified + self.unknown + self.unverified == self.total_images
            && self.total_images <= self.total_instances
    }

    /// Returns true if any image needs review (Unknown or Unverified)
    #[must_use]
    pub const fn has_findings(&self) -> bool {
        self.unknown > 0 || self.unverified > 0
    }
}

/// Final result of a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// When the report was assembled
    pub generated_at: DateTime<Utc>,
    /// Tallies
    pub summary: AuditSummary,
    /// Every classified image, grouped by category in export order and
    /// sorted by image id within a category
    pub records: Vec<ImageRecord>,
    /// Regions whose work was abandoned
    #[serde(default)]
    pub skipped_regions: Vec<String>,
}

impl Report {
    /// Build a report from final bucket state.
    ///
    /// Only reads the buckets; categories were fixed when records were
    /// filed.
    #[must_use]
    pub fn from_buckets(
        buckets: &Buckets,
        total_instances: usize,
        skipped_regions: Vec<String>,
    ) -> Self {
        let records: Vec<ImageRecord> = Category::ALL
            .iter()
            .flat_map(|c| buckets.bucket(*c).values().cloned())
            .collect();

        let summary = AuditSummary {
            total_instances,
            total_images: records.len(),
            private: buckets.bucket(Category::Private).len(),
            verified: buckets.bucket(Category::Verified).len(),
            unknown: buckets.bucket(Category::Unknown).len(),
            unverified: buckets.bucket(Category::Unverified).len(),
        };

        Self {
            generated_at: Utc::now(),
            summary,
            records,
            skipped_regions,
        }
    }

    /// Records in one category
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    /// Image ids in one category
    #[must_use]
    pub fn ids(&self, category: Category) -> Vec<&str> {
        self.in_category(category).map(|r| r.id.as_str()).collect()
    }
}
