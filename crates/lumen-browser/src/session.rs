//! Headless Chromium sessions.

use crate::error::{BrowserError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::Page;
use futures::stream::{Stream, StreamExt};
use lumen_aggregator::{SessionFactory, SharedSession};
use lumen_core::BrowserConfig;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use url::Url;

const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "file", "data"];

/// Upper bound on closing a tab, so a wedged browser cannot stall a caller.
const PAGE_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Browser session shared by every engine in an aggregation run.
pub type SharedBrowser = SharedSession<BrowserSessionFactory>;

/// Launches Chromium according to [`BrowserConfig`].
#[derive(Debug, Clone)]
pub struct BrowserSessionFactory {
    config: BrowserConfig,
}

impl BrowserSessionFactory {
    /// Create a factory for the given settings.
    #[must_use]
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    /// Settings used to launch the browser.
    #[must_use]
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Launch a browser process.
    pub async fn launch(&self) -> Result<BrowserSession> {
        let navigation_timeout = Duration::from_secs(self.config.navigation_timeout_secs);

        let mut builder = ChromeConfig::builder()
            .no_sandbox()
            .window_size(self.config.window_width, self.config.window_height)
            .request_timeout(navigation_timeout);
        if !self.config.headless {
            builder = builder.with_head();
        }
        let chrome_config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let handler = tokio::spawn(async move {
            let (events, errors) = drain_events(&mut handler).await;
            tracing::debug!(errors, "Browser event loop ended after {} events", events);
        });

        tracing::info!(
            headless = self.config.headless,
            "Launched browser ({}x{})",
            self.config.window_width,
            self.config.window_height
        );

        Ok(BrowserSession {
            browser: Mutex::new(browser),
            handler,
            navigation_timeout,
        })
    }
}

#[async_trait]
impl SessionFactory for BrowserSessionFactory {
    type Session = BrowserSession;

    async fn open(&self) -> lumen_aggregator::Result<BrowserSession> {
        Ok(self.launch().await?)
    }

    async fn close(&self, session: Arc<BrowserSession>) -> lumen_aggregator::Result<()> {
        Ok(session.shutdown().await?)
    }
}

/// A running browser.
pub struct BrowserSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Load `url` and return the rendered HTML.
    pub async fn fetch_page_content(&self, url: &str) -> Result<String> {
        let url = validate_url(url)?;
        self.with_page(&url, |page| async move {
            page.content()
                .await
                .map_err(|e| BrowserError::EvaluationError(e.to_string()))
        })
        .await
    }

    /// Load `url`, evaluate `script` in the page and deserialize its result.
    pub async fn evaluate_on_page<T>(&self, url: &str, script: &str) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = validate_url(url)?;
        let script = script.to_string();
        self.with_page(&url, |page| async move {
            page.evaluate(script)
                .await
                .map_err(|e| BrowserError::EvaluationError(e.to_string()))?
                .into_value::<T>()
                .map_err(|e| BrowserError::EvaluationError(e.to_string()))
        })
        .await
    }

    /// Close the browser and stop its event loop.
    pub async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::ChromiumError(e.to_string()));
        let _ = browser.wait().await;
        self.handler.abort();
        tracing::info!("Browser closed");
        closed
    }

    /// Open a page, run `work` on it under the navigation timeout, then close it.
    ///
    /// The page is closed whether `work` succeeds, fails or runs out of time.
    async fn with_page<T, F, Fut>(&self, url: &Url, work: F) -> Result<T>
    where
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timeout = self.navigation_timeout;
        let deadline = Instant::now() + timeout;
        let timed_out = || BrowserError::Timeout(format!("{url} after {timeout:?}"));

        let opened = timeout_at(deadline, async {
            let browser = self.browser.lock().await;
            browser
                .new_page(url.as_str())
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))
        })
        .await
        .map_err(|_| timed_out())?;
        let page = opened?;

        let run = {
            let page = page.clone();
            async move {
                page.wait_for_navigation()
                    .await
                    .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
                tracing::debug!("Loaded {}", url);
                work(page).await
            }
        };
        let close = async move {
            if let Err(e) = page.close().await {
                tracing::warn!("Failed to close page for {}: {}", url, e);
            }
        };

        settle_then_close(deadline, run, close)
            .await
            .unwrap_or_else(|| Err(timed_out()))
    }
}

/// Poll browser events until the connection ends.
///
/// Errors are logged and skipped; the stream keeps carrying responses for
/// later commands after a message it could not decode.
async fn drain_events<S, E>(events: &mut S) -> (usize, usize)
where
    S: Stream<Item = std::result::Result<(), E>> + Unpin,
    E: Display,
{
    let mut seen = 0;
    let mut errors = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(e) = event {
            errors += 1;
            tracing::debug!("Browser event error: {}", e);
        }
    }
    (seen, errors)
}

/// Run `work` until `deadline`, then run `close` however `work` ended.
/// `None` means the deadline passed first.
async fn settle_then_close<T, W, C>(deadline: Instant, work: W, close: C) -> Option<T>
where
    W: Future<Output = T>,
    C: Future<Output = ()>,
{
    let outcome = timeout_at(deadline, work).await.ok();
    if tokio::time::timeout(PAGE_CLOSE_TIMEOUT, close).await.is_err() {
        tracing::warn!("Closing page took longer than {:?}", PAGE_CLOSE_TIMEOUT);
    }
    outcome
}

/// Parse a URL and check that a browser can load it.
pub fn validate_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())
        .map_err(|e| BrowserError::InvalidUrl(format!("{input}: {e}")))?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(BrowserError::InvalidUrl(format!(
            "{input}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}
