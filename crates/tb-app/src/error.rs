//! Error types for the tb-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Study error: {0}")]
    Study(String),

    #[error("Failed to read {what} file: {path}")]
    FileRead {
        what: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Study validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tb_study::StudyError> for AppError {
    fn from(err: tb_study::StudyError) -> Self {
        match err {
            tb_study::StudyError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Study(other.to_string()),
        }
    }
}

impl From<tb_study::ValidationError> for AppError {
    fn from(err: tb_study::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<tb_results::ResultsError> for AppError {
    fn from(err: tb_results::ResultsError) -> Self {
        match err {
            tb_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
