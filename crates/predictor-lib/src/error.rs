//! Error types for the predictor library

use thiserror::Error;

/// Errors surfaced by dataset, training, and prediction operations
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("invalid date: {0}")]
    InvalidDate(#[from] chrono::ParseError),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("dataset has too few rows for training: {0}")]
    InsufficientData(usize),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model artifact checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, PredictorError>;
