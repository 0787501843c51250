//! Provider abstractions for embeddings, answer generation, and vision
//!
//! Trait-based seams so the pipeline and engines can be composed with
//! stub implementations in tests.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::{LlmProvider, VisionProvider};
pub use ollama::OllamaClient;
