//! Multi-engine aggregation.
//!
//! Runs every requested engine concurrently, isolates each engine's
//! failures (errors and panics alike), then merges, deduplicates, groups and
//! summarizes whatever the engines produced.

use crate::dedup::deduplicate;
use crate::engine::{AuditContext, AuditEngine, EngineResult};
use crate::error::EngineError;
use crate::summary::{build_summary, group_by_wcag, IssueSummary};
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use lumen_core::{AccessibilityIssue, AggregatorConfig, Tool, WcagLevel};
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

/// What to analyze and with which engines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// URL, file path or other target identifier
    pub target: String,
    /// Engines to run; `None` or empty means the configured defaults
    pub tools: Option<Vec<Tool>>,
    /// Conformance level; `None` means the configured default
    pub wcag_level: Option<WcagLevel>,
}

impl AnalyzeRequest {
    /// Request an analysis of `target` with default engines and level.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tools: None,
            wcag_level: None,
        }
    }

    /// Restrict the engines to run.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set the conformance level.
    #[must_use]
    pub fn with_wcag_level(mut self, level: WcagLevel) -> Self {
        self.wcag_level = Some(level);
        self
    }
}

/// A request with every optional field resolved against configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Trimmed target
    pub target: String,
    /// Engines to run, in request order, without repeats
    pub tools: Vec<Tool>,
    /// Conformance level
    pub wcag_level: WcagLevel,
}

impl ResolvedRequest {
    /// Fill in defaults from `config`.
    #[must_use]
    pub fn resolve(request: &AnalyzeRequest, config: &AggregatorConfig) -> Self {
        let requested = match &request.tools {
            Some(tools) if !tools.is_empty() => tools.as_slice(),
            _ => config.default_tools.as_slice(),
        };

        let mut tools = Vec::with_capacity(requested.len());
        for tool in requested {
            if !tools.contains(tool) {
                tools.push(*tool);
            }
        }

        Self {
            target: request.target.trim().to_string(),
            tools,
            wcag_level: request.wcag_level.unwrap_or(config.wcag_level),
        }
    }
}

/// Merged output of one aggregation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAnalysisResult {
    /// False if any engine failed
    pub success: bool,
    /// When the run started
    pub timestamp: DateTime<Utc>,
    /// Wall time in milliseconds
    pub duration: u64,
    /// Analyzed target
    pub target: String,
    /// Engines that were requested
    pub tools_used: Vec<Tool>,
    /// Deduplicated issues
    pub issues: Vec<AccessibilityIssue>,
    /// Deduplicated issues keyed by WCAG criterion
    #[serde(rename = "issuesByWCAG")]
    pub issues_by_wcag: BTreeMap<String, Vec<AccessibilityIssue>>,
    /// Counts over the deduplicated issues
    pub summary: IssueSummary,
    /// Per-engine results, unmodified, in request order
    pub individual_results: Vec<EngineResult>,
    /// How many issues deduplication removed
    pub deduplicated_count: usize,
    /// `"<tool>: <message>"` for every failed engine, joined with `"; "`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs registered audit engines and merges their findings.
pub struct Aggregator {
    config: AggregatorConfig,
    engines: HashMap<Tool, Arc<dyn AuditEngine>>,
}

impl Aggregator {
    /// Create an aggregator with no engines.
    #[must_use]
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            engines: HashMap::new(),
        }
    }

    /// Register an engine, replacing any engine already registered for its tool.
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn AuditEngine>) -> Self {
        self.register(engine);
        self
    }

    /// Register an engine in place.
    pub fn register(&mut self, engine: Arc<dyn AuditEngine>) {
        let tool = engine.tool();
        if self.engines.insert(tool, engine).is_some() {
            tracing::debug!("Replaced engine for {}", tool);
        }
    }

    /// Tools with a registered engine.
    #[must_use]
    pub fn registered_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.engines.keys().copied().collect();
        tools.sort();
        tools
    }

    /// Run the requested engines against the target and merge their output.
    ///
    /// Never fails: engine errors, panics and unregistered tools are
    /// recorded in the per-engine results and the combined `error`.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> CombinedAnalysisResult {
        let resolved = ResolvedRequest::resolve(request, &self.config);
        let timestamp = Utc::now();
        let started = Instant::now();

        tracing::info!(
            url = %resolved.target,
            level = %resolved.wcag_level,
            "Starting analysis with {} engines",
            resolved.tools.len()
        );

        let individual_results: Vec<EngineResult> = if resolved.target.is_empty() {
            let message = EngineError::InvalidTarget("target must not be empty".to_string());
            resolved
                .tools
                .iter()
                .map(|&tool| EngineResult::failed(tool, message.to_string(), 0))
                .collect()
        } else {
            self.run_engines(&resolved).await
        };

        let errors: Vec<String> = individual_results
            .iter()
            .filter_map(|r| r.error.as_ref().map(|e| format!("{}: {e}", r.tool)))
            .collect();

        let merged: Vec<AccessibilityIssue> = individual_results
            .iter()
            .flat_map(|r| r.issues.iter().cloned())
            .collect();
        let issues = deduplicate(&merged);
        let deduplicated_count = merged.len() - issues.len();
        let issues_by_wcag = group_by_wcag(&issues);
        let summary = build_summary(&issues);

        let duration = elapsed_ms(started);
        tracing::info!(
            issues = issues.len(),
            deduplicated = deduplicated_count,
            failed_engines = errors.len(),
            "Analysis finished in {}ms",
            duration
        );

        CombinedAnalysisResult {
            success: errors.is_empty(),
            timestamp,
            duration,
            target: resolved.target,
            tools_used: resolved.tools,
            issues,
            issues_by_wcag,
            summary,
            individual_results,
            deduplicated_count,
            error: (!errors.is_empty()).then(|| errors.join("; ")),
        }
    }

    async fn run_engines(&self, resolved: &ResolvedRequest) -> Vec<EngineResult> {
        let context = AuditContext {
            target: resolved.target.clone(),
            wcag_level: resolved.wcag_level,
        };

        let mut slots: Vec<Option<EngineResult>> = vec![None; resolved.tools.len()];
        let mut futures = FuturesUnordered::new();

        for (index, &tool) in resolved.tools.iter().enumerate() {
            match self.engines.get(&tool) {
                Some(engine) => {
                    let engine = Arc::clone(engine);
                    let context = &context;
                    futures.push(async move { (index, run_isolated(tool, engine, context).await) });
                }
                None => {
                    tracing::warn!("No engine registered for {}", tool);
                    slots[index] = Some(EngineResult::failed(
                        tool,
                        EngineError::NotRegistered(tool).to_string(),
                        0,
                    ));
                }
            }
        }

        while let Some((index, result)) = futures.next().await {
            slots[index] = Some(result);
        }

        slots.into_iter().flatten().collect()
    }
}

/// Run one engine, converting errors and panics into a failed result.
async fn run_isolated(
    tool: Tool,
    engine: Arc<dyn AuditEngine>,
    context: &AuditContext,
) -> EngineResult {
    let started = Instant::now();
    let outcome = AssertUnwindSafe(engine.analyze(context))
        .catch_unwind()
        .await;
    let duration = elapsed_ms(started);

    match outcome {
        Ok(Ok(issues)) => {
            tracing::debug!("{} reported {} issues in {}ms", tool, issues.len(), duration);
            EngineResult::succeeded(tool, issues, duration)
        }
        Ok(Err(e)) => {
            tracing::warn!("{} failed: {}", tool, e);
            EngineResult::failed(tool, e.to_string(), duration)
        }
        Err(payload) => {
            let message = format!("engine panicked: {}", panic_message(payload.as_ref()));
            tracing::error!("{} {}", tool, message);
            EngineResult::failed(tool, message, duration)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
