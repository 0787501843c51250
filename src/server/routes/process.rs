//! Document processing endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{ProcessDocumentRequest, ProcessDocumentResponse};

/// POST /process-document - start background ingestion
///
/// Validates the request, then acknowledges immediately; the pipeline
/// reports the final outcome through the status webhook.
pub async fn process_document(
    State(state): State<AppState>,
    Json(request): Json<ProcessDocumentRequest>,
) -> Result<Json<ProcessDocumentResponse>> {
    if request.document_id.trim().is_empty() {
        return Err(Error::InvalidRequest("documentId is required".to_string()));
    }
    if request.namespace.trim().is_empty() {
        return Err(Error::InvalidRequest(
            "vectorNamespace is required".to_string(),
        ));
    }

    // Reject up front if the file is already missing, before the caller
    // stops listening for a synchronous error.
    if !tokio::fs::try_exists(&request.file_path).await.unwrap_or(false) {
        return Err(Error::extraction(&request.file_path, "File not found"));
    }

    let document_id = request.document_id.clone();
    let pipeline = state.pipeline().clone();
    tokio::spawn(async move {
        pipeline.run(request).await;
    });

    Ok(Json(ProcessDocumentResponse {
        message: "Document processing started".to_string(),
        document_id,
    }))
}
