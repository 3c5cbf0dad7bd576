//! CLI argument parsing and scan dispatch.

pub mod args;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tracing::{debug, info};

use ami_audit::classify::TrustedPublishers;
use ami_audit::{audit, ScanOptions, TrustPolicy};
use ami_aws::{Ec2Inventory, RetryConfig};

use crate::config::{Config, DEFAULT_CONCURRENCY};
use crate::output::console::ConsoleObserver;
use crate::output::{export, summary, OutputFormat};

/// Effective settings after merging flags, environment and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// AWS profile
    pub profile: Option<String>,
    /// Single region to scan
    pub region: Option<String>,
    /// Extra verified publishers
    pub trusted_accounts: Vec<String>,
    /// File the caller's own public images as Private
    pub trust_own_account: bool,
    /// Regions scanned at once
    pub concurrency: usize,
    /// Overall scan timeout
    pub timeout: Option<Duration>,
    /// SDK attempts per request
    pub max_attempts: Option<u32>,
    /// Summary format
    pub format: OutputFormat,
}

impl Settings {
    /// Merge `cli` over `config`; flags (and their env fallbacks) win.
    #[must_use]
    pub fn merge(cli: &Cli, config: Config) -> Self {
        let trusted_accounts = if cli.trusted_accounts.is_empty() {
            config.trusted_accounts
        } else {
            cli.trusted_accounts.clone()
        };
        Self {
            profile: cli.profile.clone().or(config.profile),
            region: cli.region.clone().or(config.region),
            trusted_accounts,
            trust_own_account: cli.trust_own_account || config.trust_own_account,
            concurrency: cli
                .concurrency
                .or(config.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY)
                .max(1),
            timeout: cli
                .timeout
                .or(config.timeout_secs)
                .map(Duration::from_secs),
            max_attempts: config.max_attempts,
            format: cli.format.or(config.output_format).unwrap_or_default(),
        }
    }
}

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let settings = Settings::merge(&cli, config);
    debug!(?settings, "effective settings");

    let structured = settings.format.is_structured();
    if cli.verbose && !structured {
        println!("[*] Verbose mode enabled.");
    }

    let publishers = TrustedPublishers::parse(&settings.trusted_accounts)?;

    let mut builder = Ec2Inventory::builder()
        .profile(settings.profile.clone())
        .home_region(settings.region.clone());
    if let Some(attempts) = settings.max_attempts {
        builder = builder.retry(RetryConfig::new().max_attempts(attempts));
    }
    if let Some(timeout) = settings.timeout {
        builder = builder.operation_timeout(timeout);
    }
    let inventory = builder.build().await;

    let account = inventory
        .caller_account()
        .await
        .context("Error fetching account ID")?;
    info!(account = %account, "resolved caller identity");

    let policy = build_policy(publishers, settings.trust_own_account.then_some(account));

    let mut options = ScanOptions::default().concurrency(settings.concurrency);
    if let Some(timeout) = settings.timeout {
        options = options.deadline(tokio::time::Instant::now() + timeout);
    }

    let observer = ConsoleObserver::new(cli.verbose, structured);
    let report = audit(
        &inventory,
        settings.region.as_deref(),
        &policy,
        &observer,
        options,
    )
    .await
    .context("Error fetching regions")?;

    summary::print(&report, settings.format)?;

    if let Some(path) = &cli.output {
        let written = export::write(&report, path).context("Error creating output file")?;
        let message = format!("Output written to {}", written.display());
        if structured {
            eprintln!("{}", message.green());
        } else {
            println!("{}", message.green());
        }
    }

    Ok(())
}

/// Default rule table plus the opted-in extensions.
fn build_policy(publishers: TrustedPublishers, own_account: Option<String>) -> TrustPolicy {
    let policy = match own_account {
        Some(account) => TrustPolicy::default().with_own_account(account),
        None => TrustPolicy::default(),
    };
    policy.with_trusted_publishers(publishers)
}

fn setup_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("warn,ami_audit=debug,ami_aws=debug,ami_cli=debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
