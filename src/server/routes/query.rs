//! Query endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - answer a question
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    if request.question.trim().is_empty() {
        return Err(Error::InvalidRequest("question is required".to_string()));
    }

    tracing::info!("Query ({}): \"{}\"", request.mode, request.question);

    let answer = state.answer().answer(&request).await;
    Ok(Json(QueryResponse { answer }))
}
