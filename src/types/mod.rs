//! Core types for the RAG service

pub mod chunk;
pub mod query;
pub mod response;

pub use chunk::{Chunk, ChunkKind, ChunkMetadata};
pub use query::{ChatMessage, QueryMode, QueryRequest};
pub use response::{
    DeleteDocumentRequest, DeleteDocumentResponse, DeleteItemResult, DeleteManyResponse,
    HealthResponse, ProcessDocumentRequest, ProcessDocumentResponse, QueryResponse,
};
