//! Analysis pipeline error types

use thesisai_common::errors::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Longest upstream body kept in an error message
const MAX_BODY_CHARS: usize = 500;

#[derive(Error, Debug)]
pub enum AnalysisError {
    // Extraction
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt file: {0}")]
    CorruptFile(String),

    // Model call
    #[error("AI transport error: {0}")]
    Transport(String),

    #[error("AI call timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("AI endpoint returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    // Parsing
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    // Pre-flight
    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(Uuid),

    #[error("Analysis already in progress for document {0}")]
    AnalysisInProgress(Uuid),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Document belongs to another owner")]
    OwnerMismatch,

    // Collaborators
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub(crate) fn upstream_status(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > MAX_BODY_CHARS {
            let cut: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("{}...", cut)
        } else {
            body.to_string()
        };
        AnalysisError::UpstreamStatus { status, body }
    }

    /// Short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => "unsupported_format",
            AnalysisError::CorruptFile(_) => "corrupt_file",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Timeout { .. } => "timeout",
            AnalysisError::UpstreamStatus { .. } => "upstream_status",
            AnalysisError::MalformedResponse(_) => "malformed_response",
            AnalysisError::DocumentNotFound(_) => "document_not_found",
            AnalysisError::AnalysisNotFound(_) => "analysis_not_found",
            AnalysisError::AnalysisInProgress(_) => "in_progress",
            AnalysisError::Validation(_) => "validation",
            AnalysisError::OwnerMismatch => "owner_mismatch",
            AnalysisError::Storage(_) => "storage",
            AnalysisError::Database(_) => "database",
            AnalysisError::Configuration(_) => "configuration",
        }
    }
}

impl From<AppError> for AnalysisError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::BlobNotFound { .. } | AppError::Storage { .. } => {
                AnalysisError::Storage(e.to_string())
            }
            other => AnalysisError::Database(other.to_string()),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::UnsupportedFormat(message) => AppError::UnsupportedFormat { message },
            AnalysisError::CorruptFile(message) => AppError::ExtractionFailed { message },
            AnalysisError::Transport(message) => AppError::Upstream { message },
            AnalysisError::Timeout { timeout_secs } => AppError::UpstreamTimeout { timeout_secs },
            e @ AnalysisError::UpstreamStatus { .. } => AppError::Upstream { message: e.to_string() },
            AnalysisError::MalformedResponse(message) => AppError::Upstream { message },
            AnalysisError::DocumentNotFound(id) => AppError::DocumentNotFound { id: id.to_string() },
            AnalysisError::AnalysisNotFound(id) => AppError::AnalysisNotFound { id: id.to_string() },
            AnalysisError::AnalysisInProgress(id) => AppError::AnalysisInProgress {
                document_id: id.to_string(),
            },
            AnalysisError::Validation(message) => AppError::Validation { message, field: None },
            AnalysisError::OwnerMismatch => AppError::OwnerMismatch,
            AnalysisError::Storage(message) => AppError::Storage { message },
            AnalysisError::Database(message) => AppError::Internal { message },
            AnalysisError::Configuration(message) => AppError::Configuration { message },
        }
    }
}
