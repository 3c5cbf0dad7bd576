use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust category assigned to an image.
///
/// Variant order is the order categories appear in exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Public image published by Amazon or a trusted publisher
    Verified,
    /// Image private to, or published by, the scanning account
    Private,
    /// Image that no longer resolves (deleted or made private)
    Unknown,
    /// Public community image from an unverified publisher
    Unverified,
}

impl Category {
    /// Every category, in export order
    pub const ALL: [Self; 4] = [Self::Verified, Self::Private, Self::Unknown, Self::Unverified];

    /// Literal label written to exports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Verified => "Verified",
            Self::Private => "Private",
            Self::Unknown => "Unknown",
            Self::Unverified => "Unverified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_export_literals() {
        let labels: Vec<_> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, ["Verified", "Private", "Unknown", "Unverified"]);
    }

    #[test]
    fn ordering_follows_export_order() {
        let mut shuffled = vec![Category::Unverified, Category::Verified, Category::Unknown, Category::Private];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL);
    }
}
