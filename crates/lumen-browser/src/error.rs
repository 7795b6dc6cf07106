use lumen_aggregator::EngineError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("script evaluation failed: {0}")]
    EvaluationError(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

impl From<BrowserError> for EngineError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::InvalidUrl(url) => EngineError::InvalidTarget(url),
            other => EngineError::Session(other.to_string()),
        }
    }
}
