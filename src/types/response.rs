//! Request/response contracts shared with the calling backend

use serde::{Deserialize, Serialize};

/// Request to start processing an uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDocumentRequest {
    /// Document ID assigned by the calling backend
    #[serde(rename = "documentId")]
    pub document_id: String,
    /// Local path to the uploaded file
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Original filename
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// Unique namespace for this document's vector index
    #[serde(rename = "vectorNamespace")]
    pub namespace: String,
}

/// Acknowledgment that background processing has started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDocumentResponse {
    /// Status message
    pub message: String,
    /// Document ID being processed
    #[serde(rename = "documentId")]
    pub document_id: String,
}

/// The answer to a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// AI-generated answer text
    pub answer: String,
}

/// Request to delete one document's index and file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocumentRequest {
    /// Local file path to delete
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Vector namespace to delete
    #[serde(rename = "vectorNamespace")]
    pub namespace: String,
}

/// Outcome of a single-document deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocumentResponse {
    /// Status message
    pub message: String,
    /// Whether an index artifact was actually removed
    #[serde(rename = "vectorStoreDeleted")]
    pub vector_store_deleted: bool,
    /// Whether the source file was actually removed
    #[serde(rename = "fileDeleted")]
    pub file_deleted: bool,
}

/// Per-item outcome within a batch deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteItemResult {
    /// Namespace the item referred to
    pub namespace: String,
    /// Whether the item was processed without error
    pub success: bool,
    /// Whether an index artifact was actually removed
    #[serde(rename = "vectorStoreDeleted", skip_serializing_if = "Option::is_none")]
    pub vector_store_deleted: Option<bool>,
    /// Whether the source file was actually removed
    #[serde(rename = "fileDeleted", skip_serializing_if = "Option::is_none")]
    pub file_deleted: Option<bool>,
    /// Error message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a batch deletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyResponse {
    /// Status message
    pub message: String,
    /// Per-item outcomes, one entry per requested document
    pub results: Vec<DeleteItemResult>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Status message
    pub message: String,
}
