//! Application state for the RAG server

use std::sync::Arc;

use crate::answer::AnswerEngine;
use crate::config::RagConfig;
use crate::error::Result;
use crate::index::IndexStore;
use crate::ingestion::{ChunkExtractor, IngestionPipeline};
use crate::notify::{StatusNotifier, WebhookNotifier};
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaClient, VisionProvider};
use crate::retrieval::RetrievalEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Per-namespace index store
    store: Arc<IndexStore>,
    /// Background ingestion pipeline
    pipeline: Arc<IngestionPipeline>,
    /// Mode-routed answer engine
    answer: Arc<AnswerEngine>,
}

impl AppState {
    /// Create new application state, wiring all components to one
    /// Ollama client
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let ollama = Arc::new(OllamaClient::new(
            &config.llm,
            config.embeddings.dimensions,
        )?);
        tracing::info!(
            "Ollama client initialized (embed: {}, generate: {}, vision: {})",
            config.llm.embed_model,
            config.llm.generate_model,
            config.llm.vision_model
        );

        let embedder: Arc<dyn EmbeddingProvider> = ollama.clone();
        let llm: Arc<dyn LlmProvider> = ollama.clone();
        let vision: Arc<dyn VisionProvider> = ollama;

        let store = Arc::new(IndexStore::new(
            config.index.root_dir.clone(),
            embedder.clone(),
        )?);
        tracing::info!("Index store initialized: {}", config.index.root_dir.display());

        let extractor = Arc::new(ChunkExtractor::new(&config.chunking, vision));
        let notifier: Arc<dyn StatusNotifier> = Arc::new(WebhookNotifier::new(&config.notify)?);
        let pipeline = Arc::new(IngestionPipeline::new(
            extractor,
            store.clone(),
            notifier,
        ));

        let retrieval = Arc::new(RetrievalEngine::new(store.clone(), embedder));
        let answer = Arc::new(AnswerEngine::new(
            retrieval,
            llm,
            config.retrieval.top_k,
        ));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                store,
                pipeline,
                answer,
            }),
        })
    }

    /// Get the index store
    pub fn store(&self) -> &Arc<IndexStore> {
        &self.inner.store
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &Arc<IngestionPipeline> {
        &self.inner.pipeline
    }

    /// Get the answer engine
    pub fn answer(&self) -> &Arc<AnswerEngine> {
        &self.inner.answer
    }
}
