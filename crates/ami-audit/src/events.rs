//! Structured progress events emitted while scanning.
//!
//! The engine never formats user-facing text; presentation layers implement
//! [`ScanObserver`] and render events however they like.

use ami_core::Category;

use crate::report::AuditSummary;

/// Position of an instance within its region's listing (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based index
    pub index: usize,
    /// Instances listed in the region
    pub total: usize,
}

/// Something that happened during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Scan begins over this many regions
    ScanStarted {
        /// Regions to scan
        regions: usize,
    },
    /// Instance listing for a region begins
    RegionStarted {
        /// Region name
        region: String,
    },
    /// Region listing failed or its deadline expired; its remaining work
    /// is abandoned
    RegionSkipped {
        /// Region name
        region: String,
        /// Failure description
        reason: String,
    },
    /// Instances listed in a region
    RegionListed {
        /// Region name
        region: String,
        /// Instance count
        instances: usize,
    },
    /// Instance reported no image id
    InstanceWithoutImage {
        /// Region name
        region: String,
        /// Instance identifier
        instance_id: String,
        /// Position in the region listing
        position: Position,
    },
    /// Image id already classified earlier in the scan
    ImageAlreadyProcessed {
        /// Region name
        region: String,
        /// Image identifier
        image_id: String,
        /// Position in the region listing
        position: Position,
    },
    /// Image is being resolved
    ImageAnalyzing {
        /// Region name
        region: String,
        /// Image identifier
        image_id: String,
        /// Instance that referenced the image
        instance_id: String,
        /// Position in the region listing
        position: Position,
    },
    /// Image did not resolve and will be filed as Unknown
    ImageUnresolved {
        /// Region name
        region: String,
        /// Image identifier
        image_id: String,
        /// `None` when the image is gone, otherwise the lookup failure
        error: Option<String>,
        /// Position in the region listing
        position: Position,
    },
    /// Image filed into a category
    ImageClassified {
        /// Region name
        region: String,
        /// Image identifier
        image_id: String,
        /// Assigned category
        category: Category,
        /// Position in the region listing
        position: Position,
    },
    /// Region fully processed
    RegionFinished {
        /// Region name
        region: String,
    },
    /// All regions processed
    ScanFinished {
        /// Final tallies
        summary: AuditSummary,
    },
}

/// Receiver of scan events.
pub trait ScanObserver: Send + Sync {
    /// Handle one event
    fn notify(&self, event: &ScanEvent);
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScanObserver for NullObserver {
    fn notify(&self, _event: &ScanEvent) {}
}

impl<F> ScanObserver for F
where
    F: Fn(&ScanEvent) + Send + Sync,
{
    fn notify(&self, event: &ScanEvent) {
        self(event);
    }
}
