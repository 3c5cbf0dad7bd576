//! In-memory inventory and observer for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ami_core::{AuditError, ImageMetadata, Instance, Result, Visibility};

use crate::events::{ScanEvent, ScanObserver};
use crate::inventory::Inventory;

enum ImageBehavior {
    Found(ImageMetadata),
    Flaky,
}

#[derive(Default)]
pub struct MockInventory {
    regions: Vec<String>,
    instances: HashMap<String, Vec<Instance>>,
    failing: HashSet<String>,
    slow: HashMap<String, Duration>,
    images: HashMap<String, ImageBehavior>,
    latency: Option<Duration>,
    region_listing: Option<fn() -> AuditError>,
    resolve_calls: AtomicUsize,
    region_list_calls: AtomicUsize,
}

impl MockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(self, name: &str, instances: &[(&str, &str)]) -> Self {
        let instances = instances
            .iter()
            .map(|(id, ami)| Instance::new(*id, name, *ami))
            .collect();
        self.region_with_instances(name, instances)
    }

    pub fn region_with_instances(mut self, name: &str, instances: Vec<Instance>) -> Self {
        self.regions.push(name.to_string());
        self.instances.insert(name.to_string(), instances);
        self
    }

    pub fn failing_region(mut self, name: &str) -> Self {
        self.regions.push(name.to_string());
        self.failing.insert(name.to_string());
        self
    }

    pub fn slow_region(mut self, name: &str, delay: Duration) -> Self {
        self.slow.insert(name.to_string(), delay);
        self
    }

    pub fn public_image(self, id: &str, alias: Option<&str>, owner: &str) -> Self {
        self.image(id, alias, owner, Visibility::Public)
    }

    pub fn private_image(self, id: &str, owner: &str) -> Self {
        self.image(id, None, owner, Visibility::Private)
    }

    fn image(mut self, id: &str, alias: Option<&str>, owner: &str, visibility: Visibility) -> Self {
        let meta = ImageMetadata {
            owner_alias: alias.map(String::from),
            owner_id: Some(owner.to_string()),
            name: Some(format!("{id}-name")),
            description: Some(format!("{id} description")),
            visibility,
        };
        self.images.insert(id.to_string(), ImageBehavior::Found(meta));
        self
    }

    pub fn missing_image(mut self, id: &str) -> Self {
        self.images.remove(id);
        self
    }

    pub fn flaky_image(mut self, id: &str) -> Self {
        self.images.insert(id.to_string(), ImageBehavior::Flaky);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_region_listing(mut self) -> Self {
        self.region_listing = Some(|| AuditError::RegionUnavailable {
            region: "us-east-1".into(),
            message: "UnauthorizedOperation".into(),
        });
        self
    }

    pub fn fail_credentials(mut self) -> Self {
        self.region_listing = Some(|| AuditError::Credentials("ExpiredToken".into()));
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn region_list_calls(&self) -> usize {
        self.region_list_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Inventory for MockInventory {
    async fn list_regions(&self) -> Result<Vec<String>> {
        self.region_list_calls.fetch_add(1, Ordering::SeqCst);
        match self.region_listing {
            Some(fail) => Err(fail()),
            None => Ok(self.regions.clone()),
        }
    }

    async fn list_instances(&self, region: &str) -> Result<Vec<Instance>> {
        self.delay().await;
        if let Some(delay) = self.slow.get(region) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(region) {
            return Err(AuditError::region_unavailable(region, "OptInRequired"));
        }
        Ok(self.instances.get(region).cloned().unwrap_or_default())
    }

    async fn resolve_image(&self, _region: &str, image_id: &str) -> Result<Option<ImageMetadata>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        match self.images.get(image_id) {
            Some(ImageBehavior::Found(meta)) => Ok(Some(meta.clone())),
            Some(ImageBehavior::Flaky) => Err(AuditError::ImageLookup {
                image_id: image_id.to_string(),
                message: "RequestLimitExceeded".into(),
            }),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScanEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ScanObserver for RecordingObserver {
    fn notify(&self, event: &ScanEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
