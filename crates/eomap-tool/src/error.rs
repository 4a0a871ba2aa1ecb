use eomap_persist::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to parse config RON: {0}")]
    Config(String),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("re-saved file differs from the original at offset {offset}")]
    CheckFailed { offset: usize },
}
