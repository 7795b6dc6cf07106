//! Contrast engine backed by a rendered page.
//!
//! Loads the target in the shared browser session, reads the computed
//! foreground color, effective background and font metrics of every visible
//! text element, and judges them with [`analyze_samples`].

use crate::session::{validate_url, SharedBrowser};
use async_trait::async_trait;
use lumen_aggregator::{AuditContext, AuditEngine, EngineError, Result};
use lumen_contrast::{analyze_samples, ContrastOptions, ContrastSample};
use lumen_core::{AccessibilityIssue, Tool};
use std::sync::Arc;
use std::time::Duration;

const COLLECT_SAMPLES_JS: &str = include_str!("collect_samples.js");

/// Grace period on top of the browser's own navigation timeout.
const EVALUATION_GRACE: Duration = Duration::from_secs(10);

/// Reports contrast failures found on a live page.
pub struct PageContrastEngine {
    session: Arc<SharedBrowser>,
    options: ContrastOptions,
    timeout: Duration,
}

impl PageContrastEngine {
    /// Create an engine using `session`. The context's WCAG level overrides
    /// `options.level` on each run.
    #[must_use]
    pub fn new(session: Arc<SharedBrowser>, options: ContrastOptions) -> Self {
        let navigation = Duration::from_secs(session.factory().config().navigation_timeout_secs);
        Self {
            session,
            options,
            timeout: navigation + EVALUATION_GRACE,
        }
    }

    /// Override the overall timeout of one run.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn collect(&self, target: &str) -> Result<Vec<ContrastSample>> {
        validate_url(target)?;
        let browser = self.session.acquire().await?;
        let samples = browser
            .evaluate_on_page::<Vec<ContrastSample>>(target, COLLECT_SAMPLES_JS)
            .await?;
        Ok(samples)
    }
}

#[async_trait]
impl AuditEngine for PageContrastEngine {
    fn tool(&self) -> Tool {
        Tool::ContrastAnalyzer
    }

    async fn analyze(&self, context: &AuditContext) -> Result<Vec<AccessibilityIssue>> {
        let samples = tokio::time::timeout(self.timeout, self.collect(&context.target))
            .await
            .map_err(|_| EngineError::Timeout(self.timeout))??;

        let options = ContrastOptions {
            level: context.wcag_level,
            ..self.options
        };
        let report = analyze_samples(&samples, &options);

        tracing::info!(
            sampled = samples.len(),
            failing = report.summary.failing,
            skipped = report.skipped,
            "Contrast scan of {} complete",
            context.target
        );
        Ok(report.issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BrowserSessionFactory;
    use lumen_core::BrowserConfig;

    fn engine() -> PageContrastEngine {
        let config = BrowserConfig {
            navigation_timeout_secs: 5,
            ..BrowserConfig::default()
        };
        let session = Arc::new(SharedBrowser::new(BrowserSessionFactory::new(config)));
        PageContrastEngine::new(session, ContrastOptions::default())
    }

    #[test]
    fn test_reports_as_contrast_analyzer() {
        assert_eq!(engine().tool(), Tool::ContrastAnalyzer);
    }

    #[test]
    fn test_timeout_derives_from_navigation_timeout() {
        assert_eq!(engine().timeout, Duration::from_secs(15));
        let custom = engine().with_timeout(Duration::from_secs(2));
        assert_eq!(custom.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_script_returns_sample_fields() {
        for field in ["selector", "foreground", "background", "fontSizePx", "fontWeight"] {
            assert!(COLLECT_SAMPLES_JS.contains(field), "script does not emit {field}");
        }
    }
}
