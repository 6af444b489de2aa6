use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model path is empty")]
    EmptyPath,
    #[error("no model artifact found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("backend produced a non-finite {0} value")]
    NonFinite(&'static str),
    #[error("expected {expected} predictions, got {actual}")]
    BatchSize { expected: usize, actual: usize },
}
