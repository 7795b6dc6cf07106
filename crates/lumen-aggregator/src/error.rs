use lumen_core::Tool;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single audit engine or of an engine's session.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{message}")]
    Failed { tool: Tool, message: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("engine not registered: {0}")]
    NotRegistered(Tool),

    #[error("session error: {0}")]
    Session(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Convenience constructor for engine-reported failures.
    pub fn failed(tool: Tool, message: impl Into<String>) -> Self {
        Self::Failed {
            tool,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_displays_bare_message() {
        let err = EngineError::failed(Tool::Pa11y, "runner exited with status 2");
        assert_eq!(err.to_string(), "runner exited with status 2");
    }

    #[test]
    fn test_not_registered_names_tool() {
        let err = EngineError::NotRegistered(Tool::Lighthouse);
        assert_eq!(err.to_string(), "engine not registered: lighthouse");
    }
}
