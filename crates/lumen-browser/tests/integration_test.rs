use lumen_aggregator::{Aggregator, AnalyzeRequest};
use lumen_browser::{BrowserSessionFactory, PageContrastEngine, SharedBrowser};
use lumen_contrast::ContrastOptions;
use lumen_core::{AggregatorConfig, BrowserConfig, Tool};
use std::sync::Arc;

const LOW_CONTRAST_PAGE: &str = "data:text/html,<html><body style='background:%23fff'>\
<p id='faint' style='color:%23aaa'>Faint text</p>\
<p id='strong' style='color:%23000'>Strong text</p></body></html>";

fn shared_browser() -> Arc<SharedBrowser> {
    Arc::new(SharedBrowser::new(BrowserSessionFactory::new(
        BrowserConfig::default(),
    )))
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_launch_and_dispose() {
    let shared = shared_browser();
    let session = shared.acquire().await.expect("launch browser");
    let html = session
        .fetch_page_content(LOW_CONTRAST_PAGE)
        .await
        .expect("load page");
    assert!(html.contains("Faint text"));

    shared.dispose().await.expect("close browser");
    assert!(!shared.is_active().await);
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_page_contrast_engine_finds_faint_text() {
    let shared = shared_browser();
    let aggregator = Aggregator::new(AggregatorConfig::default()).with_engine(Arc::new(
        PageContrastEngine::new(Arc::clone(&shared), ContrastOptions::default()),
    ));

    let result = aggregator
        .analyze(&AnalyzeRequest::new(LOW_CONTRAST_PAGE).with_tools(vec![Tool::ContrastAnalyzer]))
        .await;
    shared.dispose().await.expect("close browser");

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].location.selector.as_deref(), Some("#faint"));
}

#[tokio::test]
async fn test_invalid_target_fails_without_launching() {
    let shared = shared_browser();
    let aggregator = Aggregator::new(AggregatorConfig::default()).with_engine(Arc::new(
        PageContrastEngine::new(Arc::clone(&shared), ContrastOptions::default()),
    ));

    let result = aggregator
        .analyze(&AnalyzeRequest::new("ftp://example.com").with_tools(vec![Tool::ContrastAnalyzer]))
        .await;

    assert!(!result.success);
    assert!(result
        .error
        .expect("combined error")
        .starts_with("contrast-analyzer: invalid target"));
    assert!(!shared.is_active().await);
}
