//! Engine that replays normalized issues from a JSON report file.
//!
//! Lets the aggregator consume output of engines that ran elsewhere (a CI
//! job running axe-core or pa11y, a saved Lighthouse run) as long as it has
//! been normalized to the issue model.

use crate::engine::{AuditContext, AuditEngine, EngineResult};
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use lumen_core::{AccessibilityIssue, Tool};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads issues for one tool from a file on disk.
///
/// Accepts either a JSON array of issues or an object shaped like
/// [`EngineResult`]. Every issue is re-tagged with this engine's tool.
#[derive(Debug, Clone)]
pub struct ReportFileEngine {
    tool: Tool,
    path: PathBuf,
}

impl ReportFileEngine {
    /// Create an engine reporting as `tool` from the file at `path`.
    pub fn new(tool: Tool, path: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            path: path.into(),
        }
    }

    /// Path of the report file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self, contents: &str) -> Result<Vec<AccessibilityIssue>> {
        let raw_issues = match serde_json::from_str::<Value>(contents)? {
            Value::Array(items) => items,
            Value::Object(mut object) => {
                if object.get("success").and_then(Value::as_bool) == Some(false) {
                    let message = object
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("report marks the run as failed")
                        .to_string();
                    return Err(EngineError::failed(self.tool, message));
                }
                match object.remove("issues") {
                    Some(Value::Array(items)) => items,
                    Some(_) => {
                        return Err(EngineError::failed(
                            self.tool,
                            "`issues` field is not an array",
                        ))
                    }
                    None => Vec::new(),
                }
            }
            _ => {
                return Err(EngineError::failed(
                    self.tool,
                    "expected an array of issues or an engine result object",
                ))
            }
        };

        raw_issues
            .into_iter()
            .map(|mut raw| {
                if let Value::Object(fields) = &mut raw {
                    let tool = Value::String(self.tool.as_str().to_string());
                    fields.insert("tool".to_string(), tool);
                }
                serde_json::from_value(raw).map_err(EngineError::from)
            })
            .collect()
    }
}

#[async_trait]
impl AuditEngine for ReportFileEngine {
    fn tool(&self) -> Tool {
        self.tool
    }

    async fn analyze(&self, _context: &AuditContext) -> Result<Vec<AccessibilityIssue>> {
        tracing::debug!("Loading {} report from {}", self.tool, self.path.display());
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let issues = self.parse(&contents)?;
        tracing::info!("Loaded {} issues from {}", issues.len(), self.path.display());
        Ok(issues)
    }
}

/// Write an engine result where a [`ReportFileEngine`] can read it back.
pub async fn write_report(path: &Path, result: &EngineResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
