//! Core types for whoAMI image provenance audits.
//!
//! This crate provides the foundational types shared by the audit engine,
//! the AWS backend and the command-line tool:
//!
//! - **Types**: instances, image metadata, classified image records and
//!   trust categories
//! - **Errors**: the audit error taxonomy in [`AuditError`]
//!
//! # Example
//!
//! ```rust
//! use ami_core::{Category, ImageMetadata, ImageRecord, Visibility};
//!
//! let meta = ImageMetadata {
//!     owner_alias: Some("amazon".into()),
//!     owner_id: Some("137112412989".into()),
//!     name: Some("al2023-ami-2023.6".into()),
//!     description: None,
//!     visibility: Visibility::Public,
//! };
//! let record = ImageRecord::resolved("ami-0abc", "us-east-1", &meta, Category::Verified);
//! assert_eq!(record.description, "Unknown");
//! ```

mod error;
pub mod types;

pub use error::{AuditError, Result};
pub use types::*;
