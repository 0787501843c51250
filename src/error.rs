//! Error types for the RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid request payload (empty question, malformed input)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Source file missing or unreadable, or the document could not be parsed
    #[error("Failed to extract '{path}': {message}")]
    Extraction { path: String, message: String },

    /// Document parsed but produced zero chunks
    #[error("No content extracted from document: {0}")]
    EmptyDocument(String),

    /// Namespace string is unusable as an artifact name
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Index could not be built (empty chunk set, embedding failure)
    #[error("Index build failed: {0}")]
    IndexBuild(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM or vision model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            Error::Extraction { path, message } => (
                StatusCode::NOT_FOUND,
                "extraction_error",
                format!("Failed to extract '{}': {}", path, message),
            ),
            Error::EmptyDocument(path) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_document",
                format!("No content extracted from document: {}", path),
            ),
            Error::InvalidNamespace(ns) => (
                StatusCode::BAD_REQUEST,
                "invalid_namespace",
                format!("Invalid namespace: {}", ns),
            ),
            Error::IndexBuild(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_build_error", msg.clone())
            }
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
