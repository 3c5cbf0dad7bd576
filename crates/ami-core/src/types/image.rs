use serde::{Deserialize, Serialize};
use std::fmt;

use super::Category;

/// Placeholder written for fields that could not be resolved
pub const UNKNOWN: &str = "Unknown";

/// Owner alias Amazon reports for images it maintains
pub const AMAZON_ALIAS: &str = "amazon";

/// Owner alias denoting the scanning account's own images
pub const SELF_ALIAS: &str = "self";

/// Launch permission visibility of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Launchable by any account
    Public,
    /// Restricted to the owner and explicitly shared accounts
    Private,
    /// Image could not be resolved
    Unknown,
}

impl Visibility {
    /// Map the API's `public` flag; absence means the flag was not reported
    #[must_use]
    pub const fn from_public_flag(public: Option<bool>) -> Self {
        match public {
            Some(true) => Self::Public,
            Some(false) => Self::Private,
            None => Self::Unknown,
        }
    }

    /// Label written to the `Public` export column
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Image metadata as returned by the image resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Owner alias (`amazon`, `self`, marketplace aliases), absent for
    /// ordinary accounts
    #[serde(default)]
    pub owner_alias: Option<String>,

    /// Owning account identifier
    #[serde(default)]
    pub owner_id: Option<String>,

    /// Image name
    #[serde(default)]
    pub name: Option<String>,

    /// Image description
    #[serde(default)]
    pub description: Option<String>,

    /// Launch permission visibility
    pub visibility: Visibility,
}

impl ImageMetadata {
    /// Returns true if the owner alias is present and equals `alias`
    #[must_use]
    pub fn has_alias(&self, alias: &str) -> bool {
        self.owner_alias.as_deref() == Some(alias)
    }

    /// Returns true if the image is launchable by any account
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

/// A classified image, filed into exactly one category bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Image identifier
    pub id: String,

    /// Region in which the image was first observed
    pub region: String,

    /// Owner alias, if any
    #[serde(default)]
    pub owner_alias: Option<String>,

    /// Owning account, or `Unknown`
    pub owner_id: String,

    /// Image name, or `Unknown`
    pub name: String,

    /// Image description, or `Unknown`
    pub description: String,

    /// Launch permission visibility
    pub visibility: Visibility,

    /// Assigned trust category
    pub category: Category,
}

impl ImageRecord {
    /// Build a record from resolved metadata
    #[must_use]
    pub fn resolved(
        id: impl Into<String>,
        region: impl Into<String>,
        meta: &ImageMetadata,
        category: Category,
    ) -> Self {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            id: id.into(),
            region: region.into(),
            owner_alias: meta.owner_alias.clone(),
            owner_id: or_unknown(&meta.owner_id),
            name: or_unknown(&meta.name),
            description: or_unknown(&meta.description),
            visibility: meta.visibility,
            category,
        }
    }

    /// Build the record for an image that could not be resolved
    #[must_use]
    pub fn unresolved(id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            owner_alias: None,
            owner_id: UNKNOWN.to_string(),
            name: UNKNOWN.to_string(),
            description: UNKNOWN.to_string(),
            visibility: Visibility::Unknown,
            category: Category::Unknown,
        }
    }
}
