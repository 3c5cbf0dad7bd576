//! Trust classification of resolved images.

pub mod policy;
pub mod publishers;

pub use policy::{Predicate, Rule, TrustPolicy};
pub use publishers::TrustedPublishers;

use ami_core::{Category, ImageMetadata};

/// Classify with the default policy.
///
/// `None` means the image could not be resolved.
#[must_use]
pub fn classify(meta: Option<&ImageMetadata>) -> Category {
    TrustPolicy::default().classify(meta)
}
