//! EC2 inventory backend.
//!
//! This crate provides [`Ec2Inventory`], the AWS implementation of
//! [`ami_audit::Inventory`], plus account identity lookup.

mod client;
mod config;
mod errors;

pub use client::{Ec2Inventory, Ec2InventoryBuilder};
pub use config::*;
pub use ami_core::{AuditError, Result};
