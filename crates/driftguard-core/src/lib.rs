//! Core types, configuration, and error handling for driftguard.
//!
//! This crate provides the shared foundation used by the other driftguard
//! crates:
//! - [`DriftError`] — unified error type using `thiserror`
//! - [`DriftguardConfig`] — configuration loaded from `.driftguard.toml`
//! - Shared types: [`CodeBundle`], [`DriftVerdict`], [`RiskLevel`],
//!   [`OutputFormat`]

mod bundle;
mod config;
mod error;
mod types;

pub use bundle::{read_doc, CodeBundle, SourceFile};
pub use config::{DriftguardConfig, GithubConfig, LlmConfig};
pub use error::DriftError;
pub use types::{DriftVerdict, OutputFormat, RiskLevel};

/// A convenience `Result` type for driftguard operations.
pub type Result<T> = std::result::Result<T, DriftError>;
