//! Scan orchestration: regions -> instances -> distinct images -> buckets.

use futures_util::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use ami_core::{AuditError, ImageRecord, Instance};

use crate::classify::TrustPolicy;
use crate::events::{Position, ScanEvent, ScanObserver};
use crate::inventory::{within, Inventory};
use crate::report::Report;
use crate::session::ScanSession;

/// Tuning for a scan run.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    /// Regions scanned at once. `1` scans sequentially, in order.
    pub concurrency: usize,
    /// Every inventory call must finish before this instant; a region that
    /// hits it is abandoned.
    pub deadline: Option<Instant>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
        }
    }
}

impl ScanOptions {
    /// Set region concurrency (minimum 1)
    #[must_use]
    pub fn concurrency(mut self, regions: usize) -> Self {
        self.concurrency = regions.max(1);
        self
    }

    /// Set the deadline
    #[must_use]
    pub const fn deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }
}

/// How a region's processing ended.
enum RegionOutcome {
    Completed,
    Abandoned(AuditError),
}

/// Drives one scan over an [`Inventory`].
pub struct Scanner<'a, I: ?Sized> {
    inventory: &'a I,
    policy: &'a TrustPolicy,
    observer: &'a dyn ScanObserver,
    options: ScanOptions,
}

impl<'a, I> Scanner<'a, I>
where
    I: Inventory + ?Sized,
{
    /// Create a scanner with default options
    #[must_use]
    pub fn new(inventory: &'a I, policy: &'a TrustPolicy, observer: &'a dyn ScanObserver) -> Self {
        Self {
            inventory,
            policy,
            observer,
            options: ScanOptions::default(),
        }
    }

    /// Replace the options
    #[must_use]
    pub const fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Scan `regions` and aggregate the result.
    ///
    /// Never fails: a region that cannot be listed is skipped and an image
    /// that cannot be resolved is filed as Unknown.
    pub async fn run(&self, regions: &[String]) -> Report {
        self.observer.notify(&ScanEvent::ScanStarted {
            regions: regions.len(),
        });

        let session = Mutex::new(ScanSession::new());
        let concurrency = self.options.concurrency.max(1);

        let outcomes: Vec<(&String, RegionOutcome)> = stream::iter(regions)
            .map(|region| {
                let session = &session;
                async move { (region, self.scan_region(region, session).await) }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut session = session.into_inner();
        for (region, outcome) in outcomes {
            match outcome {
                RegionOutcome::Completed => {}
                RegionOutcome::Abandoned(err) => {
                    warn!(region = %region, error = %err, "region skipped");
                    session.record_skipped(region);
                }
            }
        }

        let report = session.into_report();
        debug_assert!(report.summary.reconciles());
        info!(
            instances = report.summary.total_instances,
            images = report.summary.total_images,
            unverified = report.summary.unverified,
            unknown = report.summary.unknown,
            "scan finished"
        );
        self.observer.notify(&ScanEvent::ScanFinished {
            summary: report.summary,
        });
        report
    }

    async fn scan_region(&self, region: &str, session: &Mutex<ScanSession>) -> RegionOutcome {
        self.observer.notify(&ScanEvent::RegionStarted {
            region: region.to_string(),
        });

        let listing = within(
            self.options.deadline,
            || format!("listing instances in {region}"),
            self.inventory.list_instances(region),
        )
        .await;

        let instances = match listing {
            Ok(instances) => instances,
            Err(err) => return self.abandon(region, err),
        };

        session.lock().await.record_instances(instances.len());
        debug!(region, instances = instances.len(), "listed instances");
        self.observer.notify(&ScanEvent::RegionListed {
            region: region.to_string(),
            instances: instances.len(),
        });

        let total = instances.len();
        for (i, instance) in instances.iter().enumerate() {
            let position = Position {
                index: i + 1,
                total,
            };
            if let Err(err) = self.process_instance(region, instance, position, session).await {
                return self.abandon(region, err);
            }
        }

        self.observer.notify(&ScanEvent::RegionFinished {
            region: region.to_string(),
        });
        RegionOutcome::Completed
    }

    /// Handle one instance. Only a deadline expiry escapes as an error.
    async fn process_instance(
        &self,
        region: &str,
        instance: &Instance,
        position: Position,
        session: &Mutex<ScanSession>,
    ) -> Result<(), AuditError> {
        let Some(image_id) = instance.image_id.as_deref() else {
            self.observer.notify(&ScanEvent::InstanceWithoutImage {
                region: region.to_string(),
                instance_id: instance.instance_id.clone(),
                position,
            });
            return Ok(());
        };

        if !session.lock().await.claim(image_id) {
            self.observer.notify(&ScanEvent::ImageAlreadyProcessed {
                region: region.to_string(),
                image_id: image_id.to_string(),
                position,
            });
            return Ok(());
        }

        self.observer.notify(&ScanEvent::ImageAnalyzing {
            region: region.to_string(),
            image_id: image_id.to_string(),
            instance_id: instance.instance_id.clone(),
            position,
        });

        let lookup = within(
            self.options.deadline,
            || format!("resolving {image_id} in {region}"),
            self.inventory.resolve_image(region, image_id),
        )
        .await;

        let (record, deadline_hit) = match lookup {
            Ok(Some(meta)) => {
                let category = self.policy.classify(Some(&meta));
                debug!(
                    image_id,
                    %category,
                    rule = self.policy.matching_rule(&meta).map_or("fallback", |r| r.name),
                    "classified image"
                );
                (ImageRecord::resolved(image_id, region, &meta, category), None)
            }
            Ok(None) => {
                self.unresolved(region, image_id, None, position);
                (ImageRecord::unresolved(image_id, region), None)
            }
            Err(err) => {
                warn!(image_id, region, error = %err, "image lookup failed, filing as Unknown");
                self.unresolved(region, image_id, Some(err.to_string()), position);
                let deadline_hit = matches!(err, AuditError::DeadlineExceeded { .. }).then_some(err);
                (ImageRecord::unresolved(image_id, region), deadline_hit)
            }
        };

        let category = record.category;
        session.lock().await.file(record);
        self.observer.notify(&ScanEvent::ImageClassified {
            region: region.to_string(),
            image_id: image_id.to_string(),
            category,
            position,
        });

        deadline_hit.map_or(Ok(()), Err)
    }

    fn unresolved(&self, region: &str, image_id: &str, error: Option<String>, position: Position) {
        self.observer.notify(&ScanEvent::ImageUnresolved {
            region: region.to_string(),
            image_id: image_id.to_string(),
            error,
            position,
        });
    }

    fn abandon(&self, region: &str, err: AuditError) -> RegionOutcome {
        self.observer.notify(&ScanEvent::RegionSkipped {
            region: region.to_string(),
            reason: err.to_string(),
        });
        RegionOutcome::Abandoned(err)
    }
}
