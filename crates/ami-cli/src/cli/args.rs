//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Audit the provenance of the images behind your EC2 instances
///
/// Every running or stopped instance is traced back to the image it was
/// launched from, and each image is filed as Private, Verified, Unknown or
/// Unverified. Public images from unverified accounts deserve a closer look:
/// anyone can publish an image with a convincing name.
#[derive(Parser, Debug)]
#[command(name = "whoami-check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// AWS profile to use (or set AWS_PROFILE)
    #[arg(short, long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Scan only this region instead of every enabled region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Write the pipe-delimited export to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print a line for every instance and image
    #[arg(short, long)]
    pub verbose: bool,

    /// Account id whose public images count as verified (repeatable)
    #[arg(long = "trusted-account", value_name = "ID")]
    pub trusted_accounts: Vec<String>,

    /// File public images owned by the scanning account as Private
    #[arg(long)]
    pub trust_own_account: bool,

    /// Regions scanned at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Give up on regions still running after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Summary format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "whoami-check",
            "--profile",
            "audit",
            "--region",
            "eu-west-1",
            "--output",
            "out/amis.txt",
            "--trusted-account",
            "123456789012",
            "--trusted-account",
            "210987654321",
            "--format",
            "json",
            "--trust-own-account",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.profile.as_deref(), Some("audit"));
        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cli.output, Some(PathBuf::from("out/amis.txt")));
        assert_eq!(cli.trusted_accounts.len(), 2);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(cli.verbose);
        assert!(cli.trust_own_account);
        assert!(!cli.no_color);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["whoami-check", "--format", "xml"]).is_err());
    }
}
