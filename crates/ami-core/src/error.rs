use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that can occur while auditing image provenance
#[derive(Error, Debug)]
pub enum AuditError {
    /// Credentials could not be resolved or the caller identity was rejected
    #[error("credential or authorization failure: {0}")]
    Credentials(String),

    /// The set of regions to scan could not be determined
    #[error("unable to list regions: {0}")]
    RegionDiscovery(String),

    /// A single region could not be enumerated
    #[error("region {region} unavailable: {message}")]
    RegionUnavailable {
        /// Region that failed
        region: String,
        /// Underlying failure description
        message: String,
    },

    /// The image was deleted or is no longer visible to the account
    #[error("image {image_id} not found")]
    ImageNotFound {
        /// Image identifier
        image_id: String,
    },

    /// Image lookup failed for a reason other than not-found
    #[error("image lookup failed for {image_id}: {message}")]
    ImageLookup {
        /// Image identifier
        image_id: String,
        /// Underlying failure description
        message: String,
    },

    /// The caller-supplied deadline expired before the call completed
    #[error("deadline exceeded while {operation}")]
    DeadlineExceeded {
        /// What was in flight when the deadline hit
        operation: String,
    },

    /// Writing the export file failed
    #[error("export to {path} failed: {message}")]
    Export {
        /// Destination of the export
        path: String,
        /// Underlying failure description
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Returns true if the whole audit must stop
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Credentials(_) | Self::RegionDiscovery(_) | Self::Config(_)
        )
    }

    /// Returns true if the error only invalidates the region being scanned
    #[must_use]
    pub const fn is_region_scoped(&self) -> bool {
        matches!(
            self,
            Self::RegionUnavailable { .. } | Self::DeadlineExceeded { .. }
        )
    }

    /// Returns true if the error means the image no longer resolves
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ImageNotFound { .. })
    }

    /// Wrap any failure raised while enumerating `region`
    #[must_use]
    pub fn region_unavailable(region: impl Into<String>, message: impl ToString) -> Self {
        Self::RegionUnavailable {
            region: region.into(),
            message: message.to_string(),
        }
    }
}
