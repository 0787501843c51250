//! Multi-namespace retrieval with partial-failure tolerance

use futures::future::join_all;
use std::sync::Arc;

use crate::error::Result;
use crate::index::{IndexStore, LoadOutcome};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// Fans a query out across namespaces and concatenates the hits
///
/// Relevance ordering is only meaningful within a namespace; results are
/// concatenated in namespace order with no global re-ranking.
pub struct RetrievalEngine {
    store: Arc<IndexStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RetrievalEngine {
    /// Create a new retrieval engine
    pub fn new(store: Arc<IndexStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Search the given namespaces, at most `k` chunks per namespace
    ///
    /// Missing namespaces are skipped silently (expected condition);
    /// corrupt ones are logged and skipped. An empty namespace list
    /// returns an empty result without embedding the query.
    pub async fn search(&self, query: &str, namespaces: &[String], k: usize) -> Result<Vec<Chunk>> {
        if namespaces.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;

        let searches = namespaces
            .iter()
            .map(|namespace| self.search_namespace(namespace, &query_embedding, k));
        let per_namespace = join_all(searches).await;

        let results: Vec<Chunk> = per_namespace.into_iter().flatten().collect();
        tracing::info!(
            "Retrieved {} chunks across {} namespace(s)",
            results.len(),
            namespaces.len()
        );

        Ok(results)
    }

    /// Search one namespace, absorbing its failures
    async fn search_namespace(&self, namespace: &str, query: &[f32], k: usize) -> Vec<Chunk> {
        match self.store.load(namespace).await {
            LoadOutcome::Found(index) => {
                let hits = index.search(query, k);
                tracing::debug!("Found {} results in namespace {}", hits.len(), namespace);
                hits.into_iter().map(|hit| hit.chunk).collect()
            }
            LoadOutcome::NotFound => {
                tracing::debug!("Namespace not found, skipping: {}", namespace);
                Vec::new()
            }
            LoadOutcome::Corrupt(message) => {
                tracing::warn!("Skipping unusable namespace {}: {}", namespace, message);
                Vec::new()
            }
        }
    }
}
