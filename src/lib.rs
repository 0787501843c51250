//! finchat-rag: RAG backend for financial document chat
//!
//! Ingests PDF documents (text and images) into per-document vector
//! indices and answers questions over them with a local Ollama model.
//! Each document gets its own namespace; queries fan out across the
//! selected namespaces and the answer is synthesized per query mode.

pub mod answer;
pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod notify;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    chunk::{Chunk, ChunkKind, ChunkMetadata},
    query::{QueryMode, QueryRequest},
    response::QueryResponse,
};
