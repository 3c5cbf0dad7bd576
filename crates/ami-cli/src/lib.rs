//! # ami-cli
//!
//! Command-line front end for the image provenance audit.
//!
//! ## Features
//!
//! - **Account-wide scan**: every enabled region, or a single one with `--region`
//! - **Trusted publishers**: treat extra account ids as verified
//! - **Export**: pipe-delimited file with one row per image
//! - **Multiple output formats**: pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
