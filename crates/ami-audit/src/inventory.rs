//! Backend capabilities the scan consumes.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

use ami_core::{AuditError, ImageMetadata, Instance, Result};

/// Read-only view of a cloud account's instances and images.
///
/// Implementations must not cache across calls: every call reflects the
/// account as it is now.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Regions enabled for the account.
    ///
    /// Only consulted when the caller did not name a region.
    async fn list_regions(&self) -> Result<Vec<String>>;

    /// Instances currently present in `region`.
    ///
    /// Any error makes the scan skip the region.
    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>>;

    /// Metadata for `image_id` as seen from `region`.
    ///
    /// `Ok(None)` means the image was deleted or is no longer shared with
    /// the account.
    async fn resolve_image(&self, region: &str, image_id: &str) -> Result<Option<ImageMetadata>>;
}

#[async_trait]
impl<T> Inventory for Arc<T>
where
    T: Inventory + ?Sized,
{
    async fn list_regions(&self) -> Result<Vec<String>> {
        (**self).list_regions().await
    }

    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>> {
        (**self).list_instances(region).await
    }

    async fn resolve_image(&self, region: &str, image_id: &str) -> Result<Option<ImageMetadata>> {
        (**self).resolve_image(region, image_id).await
    }
}

/// Await `fut`, failing with [`AuditError::DeadlineExceeded`] once
/// `deadline` passes.
pub(crate) async fn within<T, F>(
    deadline: Option<Instant>,
    operation: impl FnOnce() -> String,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(at) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| AuditError::DeadlineExceeded {
                operation: operation(),
            })?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn no_deadline_passes_through() {
        let value = within(None, || "noop".into(), async { Ok::<_, AuditError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_deadline_names_operation() {
        let deadline = Instant::now() + Duration::from_millis(10);
        let err = within(Some(deadline), || "listing instances in us-east-1".into(), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, AuditError>(())
        })
        .await
        .unwrap_err();

        assert!(err.is_region_scoped());
        assert!(err.to_string().contains("us-east-1"));
    }
}
