//! API routes for the RAG server

pub mod delete;
pub mod process;
pub mod query;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/process-document", post(process::process_document))
        .route("/query", post(query::query))
        .route("/delete-document", post(delete::delete_document))
        .route("/delete-documents", post(delete::delete_many))
}
