//! Lumen Aggregator - multi-engine accessibility issue aggregation.
//!
//! Runs several audit engines against one target, isolates their failures,
//! and merges their findings into a single deduplicated report grouped by
//! WCAG success criterion.
//!
//! # Features
//!
//! - Concurrent engine execution with per-engine error and panic isolation
//! - Cross-engine rule equivalence and fingerprint-based deduplication
//! - WCAG criterion grouping and severity/principle/tool summaries
//! - Shared session lifecycle for engines backed by expensive clients
//! - Replay of normalized JSON reports as an engine
//!
//! # Example
//!
//! ```rust,ignore
//! use lumen_aggregator::{Aggregator, AnalyzeRequest, ReportFileEngine};
//! use lumen_core::{AggregatorConfig, Tool};
//! use std::sync::Arc;
//!
//! let aggregator = Aggregator::new(AggregatorConfig::default())
//!     .with_engine(Arc::new(ReportFileEngine::new(Tool::Axe, "axe.json")))
//!     .with_engine(Arc::new(ReportFileEngine::new(Tool::Pa11y, "pa11y.json")));
//!
//! let request =
//!     AnalyzeRequest::new("https://example.com").with_tools(vec![Tool::Axe, Tool::Pa11y]);
//! let result = aggregator.analyze(&request).await;
//! println!("{} unique issues", result.issues.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
pub mod dedup;
pub mod engine;
#[allow(missing_docs)]
pub mod error;
pub mod fingerprint;
pub mod report_file;
pub mod rules;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use aggregator::{Aggregator, AnalyzeRequest, CombinedAnalysisResult, ResolvedRequest};
pub use dedup::deduplicate;
pub use engine::{AuditContext, AuditEngine, EngineResult};
pub use error::{EngineError, Result};
pub use fingerprint::Fingerprint;
pub use report_file::{write_report, ReportFileEngine};
pub use rules::{classify, DefectClass};
pub use session::{SessionFactory, SharedSession};
pub use summary::{build_summary, group_by_wcag, IssueSummary};
