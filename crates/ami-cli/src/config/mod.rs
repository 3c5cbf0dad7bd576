//! Configuration management.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Fallback region count scanned at once.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default AWS profile.
    pub profile: Option<String>,

    /// Restrict scans to one region.
    pub region: Option<String>,

    /// Account ids whose public images are treated as verified.
    pub trusted_accounts: Vec<String>,

    /// File public images owned by the scanning account as Private.
    pub trust_own_account: bool,

    /// Regions scanned at once.
    pub concurrency: Option<usize>,

    /// Overall scan timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// SDK attempts per request, first try included.
    pub max_attempts: Option<u32>,

    /// Default summary format.
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "whoami-check")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse TOML configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let config = Config::parse(
            r#"
            profile = "audit"
            region = "eu-west-1"
            trusted_accounts = ["123456789012"]
            trust_own_account = true
            concurrency = 4
            timeout_secs = 300
            max_attempts = 5
            output_format = "yaml"
            "#,
        )
        .unwrap();

        assert_eq!(config.profile.as_deref(), Some("audit"));
        assert_eq!(config.trusted_accounts, ["123456789012"]);
        assert!(config.trust_own_account);
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.timeout_secs, Some(300));
        assert_eq!(config.max_attempts, Some(5));
        assert_eq!(config.output_format, Some(OutputFormat::Yaml));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("api_key = \"x\"").is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());

        let present = dir.path().join("config.toml");
        std::fs::write(&present, "concurrency = 2\n").unwrap();
        assert_eq!(Config::load(Some(&present)).unwrap().concurrency, Some(2));
    }
}
