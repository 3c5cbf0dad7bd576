//! EC2-backed inventory implementation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ec2 as ec2;
use aws_sdk_ec2::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::operation::describe_images::{DescribeImagesError, DescribeImagesOutput};
use aws_sdk_ec2::types::{Filter, Image, Reservation};
use aws_sdk_sts as sts;
use aws_types::region::Region;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use ami_audit::Inventory;
use ami_core::{AuditError, ImageMetadata, Instance, Result, Visibility};

use crate::config::{RetryConfig, DEFAULT_HOME_REGION};
use crate::errors::{describe, is_auth_failure, is_image_not_found};

/// Instance states whose launch image is still relevant.
const LISTED_STATES: [&str; 4] = ["pending", "running", "stopping", "stopped"];

/// Read-only view of an AWS account's EC2 instances and images.
#[derive(Clone)]
pub struct Ec2Inventory {
    inner: Arc<InventoryInner>,
}

struct InventoryInner {
    sdk: SdkConfig,
}

impl Ec2Inventory {
    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> Ec2InventoryBuilder {
        Ec2InventoryBuilder::new()
    }

    /// Wrap an already-loaded SDK configuration
    #[must_use]
    pub fn from_sdk_config(sdk: SdkConfig) -> Self {
        Self {
            inner: Arc::new(InventoryInner { sdk }),
        }
    }

    /// Region used for account-level calls
    #[must_use]
    pub fn home_region(&self) -> Option<&str> {
        self.inner.sdk.region().map(Region::as_ref)
    }

    /// Account id of the resolved credentials.
    ///
    /// Any failure here is a credential failure: nothing else can work.
    pub async fn caller_account(&self) -> Result<String> {
        let client = sts::Client::new(&self.inner.sdk);
        let identity = client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| AuditError::Credentials(describe(&e)))?;

        identity
            .account()
            .map(str::to_owned)
            .ok_or_else(|| AuditError::Credentials("caller identity has no account id".into()))
    }

    /// EC2 client pinned to `region`
    fn regional(&self, region: &str) -> ec2::Client {
        let conf = ec2::config::Builder::from(&self.inner.sdk)
            .region(Region::new(region.to_string()))
            .build();
        ec2::Client::from_conf(conf)
    }
}

#[async_trait]
impl Inventory for Ec2Inventory {
    async fn list_regions(&self) -> Result<Vec<String>> {
        let client = ec2::Client::new(&self.inner.sdk);
        let out = client.describe_regions().send().await.map_err(|e| {
            if is_auth_failure(e.code()) {
                AuditError::Credentials(describe(&e))
            } else {
                AuditError::RegionDiscovery(describe(&e))
            }
        })?;

        let regions: Vec<String> = out
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(str::to_owned))
            .collect();
        debug!(count = regions.len(), "enabled regions");
        Ok(regions)
    }

    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>> {
        let client = self.regional(region);
        let state_filter = LISTED_STATES
            .iter()
            .fold(Filter::builder().name("instance-state-name"), |f, s| f.values(*s))
            .build();

        let mut instances = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let resp = client
                .describe_instances()
                .filters(state_filter.clone())
                .set_next_token(token.take())
                .send()
                .await
                .map_err(|e| AuditError::region_unavailable(region, describe(&e)))?;

            instances.extend(instances_from(resp.reservations(), region));

            token = resp.next_token().map(str::to_owned);
            if token.is_none() {
                break;
            }
        }

        debug!(region, count = instances.len(), "described instances");
        Ok(instances)
    }

    async fn resolve_image(&self, region: &str, image_id: &str) -> Result<Option<ImageMetadata>> {
        let resp = self
            .regional(region)
            .describe_images()
            .image_ids(image_id)
            .include_deprecated(true)
            .send()
            .await;

        lookup_outcome(resp, region, image_id)
    }
}

/// Interpret a `DescribeImages` response for a single image id.
///
/// Not-found codes and an empty result both mean the image is gone.
fn lookup_outcome<R>(
    resp: std::result::Result<DescribeImagesOutput, SdkError<DescribeImagesError, R>>,
    region: &str,
    image_id: &str,
) -> Result<Option<ImageMetadata>>
where
    R: std::fmt::Debug,
{
    let out = match resp {
        Ok(out) => out,
        Err(e) if is_image_not_found(e.code()) => {
            debug!(image_id, region, code = e.code(), "image not found");
            return Ok(None);
        }
        Err(e) => {
            warn!(image_id, region, "describe images failed");
            return Err(AuditError::ImageLookup {
                image_id: image_id.to_string(),
                message: describe(&e),
            });
        }
    };

    Ok(out
        .images()
        .iter()
        .find(|img| img.image_id() == Some(image_id))
        .map(image_metadata))
}

/// Flatten reservations into instance observations.
///
/// Entries without an instance id are dropped; a missing image id is kept
/// as `None` so the instance still counts.
fn instances_from(reservations: &[Reservation], region: &str) -> Vec<Instance> {
    reservations
        .iter()
        .flat_map(Reservation::instances)
        .filter_map(|inst| {
            Some(Instance {
                instance_id: inst.instance_id()?.to_string(),
                region: region.to_string(),
                image_id: inst.image_id().map(str::to_owned),
            })
        })
        .collect()
}

fn image_metadata(image: &Image) -> ImageMetadata {
    ImageMetadata {
        owner_alias: image.image_owner_alias().map(str::to_owned),
        owner_id: image.owner_id().map(str::to_owned),
        name: image.name().map(str::to_owned),
        description: image.description().map(str::to_owned),
        visibility: Visibility::from_public_flag(image.public()),
    }
}

/// Builder for configuring an [`Ec2Inventory`]
#[derive(Debug, Clone, Default)]
pub struct Ec2InventoryBuilder {
    profile: Option<String>,
    home_region: Option<String>,
    operation_timeout: Option<Duration>,
    retry_config: RetryConfig,
}

impl Ec2InventoryBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named profile from the shared config/credentials files
    #[must_use]
    pub fn profile(mut self, profile: Option<impl Into<String>>) -> Self {
        self.profile = profile.map(Into::into);
        self
    }

    /// Region for account-level calls (defaults to `us-east-1`)
    #[must_use]
    pub fn home_region(mut self, region: Option<impl Into<String>>) -> Self {
        self.home_region = region.map(Into::into);
        self
    }

    /// Upper bound on a single SDK operation, retries included
    #[must_use]
    pub const fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Set retry configuration
    #[must_use]
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Resolve credentials and build the inventory
    pub async fn build(self) -> Ec2Inventory {
        let region = self
            .home_region
            .unwrap_or_else(|| DEFAULT_HOME_REGION.to_string());

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .retry_config(self.retry_config.to_sdk());

        if let Some(profile) = self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(timeout) = self.operation_timeout {
            loader = loader.timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }

        Ec2Inventory::from_sdk_config(loader.load().await)
    }
}
