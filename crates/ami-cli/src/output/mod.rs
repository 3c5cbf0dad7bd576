//! Output formatting for different formats.

pub mod console;
pub mod export;
pub mod summary;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Available summary formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Summary key and tallies with colors
    #[default]
    Pretty,
    /// JSON report
    Json,
    /// YAML report
    Yaml,
}

impl OutputFormat {
    /// Whether the format is meant for machines
    #[must_use]
    pub const fn is_structured(self) -> bool {
        !matches!(self, Self::Pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pretty_is_unstructured() {
        assert!(!OutputFormat::Pretty.is_structured());
        assert!(OutputFormat::Json.is_structured());
        assert!(OutputFormat::Yaml.is_structured());
    }
}
