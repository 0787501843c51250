//! Document deletion endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{
    DeleteDocumentRequest, DeleteDocumentResponse, DeleteItemResult, DeleteManyResponse,
};

/// POST /delete-document - delete one document's index and file
pub async fn delete_document(
    State(state): State<AppState>,
    Json(request): Json<DeleteDocumentRequest>,
) -> Result<Json<DeleteDocumentResponse>> {
    let vector_store_deleted = state.store().delete(&request.namespace).await?;
    let file_deleted = remove_file(&request.file_path).await?;

    tracing::info!(
        "Deleted document (namespace: {}, index: {}, file: {})",
        request.namespace,
        vector_store_deleted,
        file_deleted
    );

    Ok(Json(DeleteDocumentResponse {
        message: "Document deleted".to_string(),
        vector_store_deleted,
        file_deleted,
    }))
}

/// POST /delete-documents - delete a batch of documents
///
/// One failing item never aborts the batch; the response carries one
/// entry per requested document in request order.
pub async fn delete_many(
    State(state): State<AppState>,
    Json(documents): Json<Vec<DeleteDocumentRequest>>,
) -> Json<DeleteManyResponse> {
    let mut results = Vec::with_capacity(documents.len());

    for item in &documents {
        let result = match delete_one(&state, item).await {
            Ok((vector_store_deleted, file_deleted)) => DeleteItemResult {
                namespace: item.namespace.clone(),
                success: true,
                vector_store_deleted: Some(vector_store_deleted),
                file_deleted: Some(file_deleted),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Batch deletion item {} failed: {}", item.namespace, e);
                DeleteItemResult {
                    namespace: item.namespace.clone(),
                    success: false,
                    vector_store_deleted: None,
                    file_deleted: None,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    Json(DeleteManyResponse {
        message: format!("Deleted {} of {} documents", succeeded, results.len()),
        results,
    })
}

async fn delete_one(state: &AppState, item: &DeleteDocumentRequest) -> Result<(bool, bool)> {
    let vector_store_deleted = state.store().delete(&item.namespace).await?;
    let file_deleted = remove_file(&item.file_path).await?;
    Ok((vector_store_deleted, file_deleted))
}

/// Remove a file, treating an already-missing file as a no-op
async fn remove_file(path: &str) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
