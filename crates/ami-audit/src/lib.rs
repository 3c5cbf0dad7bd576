//! # ami-audit
//!
//! Provenance audit for the machine images behind running instances.
//!
//! An instance is only as trustworthy as the image it booted from. Anyone can
//! publish a public image with a convincing name, so an image picked by name
//! alone may come from an arbitrary account (the "whoAMI" naming confusion).
//! This crate walks every instance in a set of regions, resolves each distinct
//! image once and files it into a trust [`Category`].
//!
//! ## Categories
//!
//! - **Verified** -- public, published by Amazon (or a configured trusted
//!   publisher)
//! - **Private** -- not public, or owned by the scanning account
//! - **Unknown** -- the image no longer resolves (deleted or unshared)
//! - **Unverified** -- public, from any other account
//!
//! ## Data Flow
//!
//! ```text
//! regions (explicit, or Inventory::list_regions)
//!   -> Inventory::list_instances(region)        region failure = skip
//!   -> ScanSession::claim(image_id)              already seen = skip
//!   -> Inventory::resolve_image(region, id)      not found = Unknown
//!   -> TrustPolicy::classify(metadata)
//!   -> ScanSession::file(record)
//!   -> Report (summary + ordered records) -> export
//! ```

pub mod cache;
pub mod classify;
pub mod events;
pub mod export;
pub mod inventory;
pub mod report;
pub mod scan;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use ami_core::{AuditError, Result};
pub use ami_core::types::*;
pub use cache::ImageCache;
pub use classify::{classify, TrustPolicy};
pub use events::{NullObserver, Position, ScanEvent, ScanObserver};
pub use inventory::Inventory;
pub use report::{AuditSummary, Report};
pub use scan::{ScanOptions, Scanner};
pub use session::ScanSession;

use tracing::info;

/// Audit every instance visible to `inventory`.
///
/// When `region` is given only that region is scanned, otherwise the
/// inventory's region list is used. Failing to list regions is fatal;
/// everything below the account level degrades into skips and Unknowns.
///
/// # Errors
///
/// Returns [`AuditError::RegionDiscovery`] (or the backend's fatal error)
/// if the region list cannot be obtained.
pub async fn audit<I>(
    inventory: &I,
    region: Option<&str>,
    policy: &TrustPolicy,
    observer: &dyn ScanObserver,
    options: ScanOptions,
) -> Result<Report>
where
    I: Inventory + ?Sized,
{
    let regions = match region {
        Some(r) => vec![r.to_string()],
        None => inventory.list_regions().await.map_err(|e| {
            if e.is_fatal() {
                e
            } else {
                AuditError::RegionDiscovery(e.to_string())
            }
        })?,
    };
    info!(regions = regions.len(), "starting image provenance audit");

    let scanner = Scanner::new(inventory, policy, observer).with_options(options);
    Ok(scanner.run(&regions).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockInventory, RecordingObserver};

    #[tokio::test]
    async fn explicit_region_skips_region_listing() {
        let inventory = MockInventory::new()
            .region("us-east-1", &[("i-1", "ami-1")])
            .region("eu-west-1", &[("i-2", "ami-2")])
            .public_image("ami-1", Some("amazon"), "137112412989")
            .public_image("ami-2", None, "999999999999");
        let observer = RecordingObserver::default();

        let report = audit(
            &inventory,
            Some("eu-west-1"),
            &TrustPolicy::default(),
            &observer,
            ScanOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(inventory.region_list_calls(), 0);
        assert_eq!(report.summary.total_instances, 1);
        assert_eq!(report.summary.unverified, 1);
    }

    #[tokio::test]
    async fn region_listing_failure_is_fatal() {
        let inventory = MockInventory::new().fail_region_listing();
        let err = audit(
            &inventory,
            None,
            &TrustPolicy::default(),
            &NullObserver,
            ScanOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(err.is_fatal());
        assert!(matches!(err, AuditError::RegionDiscovery(_)));
    }

    #[tokio::test]
    async fn credential_failure_propagates_unchanged() {
        let inventory = MockInventory::new().fail_credentials();
        let err = audit(
            &inventory,
            None,
            &TrustPolicy::default(),
            &NullObserver,
            ScanOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AuditError::Credentials(_)));
    }
}
