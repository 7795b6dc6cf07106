//! Lumen Core - Foundation crate for the Lumen accessibility toolkit.
//!
//! This crate provides the normalized issue model shared by every audit
//! engine, the WCAG reference catalog, error handling and configuration
//! management that all other Lumen crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Issue model and shared enums (`Tool`, `Severity`, `WcagLevel`, ...)
//! - [`wcag`] - Read-only WCAG 2.1 success criterion catalog
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{AccessibilityIssue, Severity, Tool, wcag};
//!
//! let issue = AccessibilityIssue::new(Tool::Axe, "image-alt", Severity::Critical, "No alt text")
//!     .with_selector("#hero > img")
//!     .with_wcag(wcag::reference_for("1.1.1").expect("known criterion"));
//!
//! assert_eq!(issue.criterion(), Some("1.1.1"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;
pub mod wcag;

// Re-export commonly used types
pub use config::{AggregatorConfig, AppConfig, BrowserConfig, ContrastConfig, LoggingConfig};
pub use error::{ConfigError, ConfigResult, LumenError};
pub use types::{
    AccessibilityIssue, ContrastData, ContrastMetric, IssueLocation, Severity, SuggestedFix, Tool,
    WcagLevel, WcagPrinciple, WcagReference,
};
