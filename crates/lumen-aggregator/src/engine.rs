//! Audit engine abstraction.
//!
//! An engine wraps one source of findings (a DOM rule scanner, a page
//! scorer, a report file, the contrast analyzer) and normalizes its output
//! into [`AccessibilityIssue`] values.

use crate::error::Result;
use async_trait::async_trait;
use lumen_core::{AccessibilityIssue, Tool, WcagLevel};
use serde::{Deserialize, Serialize};

/// Inputs shared by every engine in one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    /// URL, file path or other target identifier
    pub target: String,
    /// Conformance level the engines should test against
    pub wcag_level: WcagLevel,
}

/// A source of accessibility findings.
///
/// Implementations own their own timeouts; the aggregator waits for every
/// engine to settle.
#[async_trait]
pub trait AuditEngine: Send + Sync {
    /// Which tool this engine reports as.
    fn tool(&self) -> Tool;

    /// Run the engine against a target.
    ///
    /// # Errors
    /// Returns error if the underlying tool fails or its output cannot be read.
    async fn analyze(&self, context: &AuditContext) -> Result<Vec<AccessibilityIssue>>;
}

/// Outcome of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineResult {
    /// Engine that ran
    pub tool: Tool,
    /// Whether the engine completed
    pub success: bool,
    /// Issues reported by the engine (empty on failure)
    #[serde(default)]
    pub issues: Vec<AccessibilityIssue>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time in milliseconds
    #[serde(default)]
    pub duration: u64,
}

impl EngineResult {
    /// A successful run.
    #[must_use]
    pub fn succeeded(tool: Tool, issues: Vec<AccessibilityIssue>, duration: u64) -> Self {
        Self {
            tool,
            success: true,
            issues,
            error: None,
            duration,
        }
    }

    /// A failed run.
    #[must_use]
    pub fn failed(tool: Tool, error: impl Into<String>, duration: u64) -> Self {
        Self {
            tool,
            success: false,
            issues: Vec::new(),
            error: Some(error.into()),
            duration,
        }
    }
}
