//! Flat cosine-similarity vector index
//!
//! Each namespace's index is small (one document's chunks), so a flat
//! scan beats the bookkeeping of an approximate structure. The artifact
//! format keeps vectors and chunks together, sufficient to reconstruct
//! chunks from a similarity query.

use serde::{Deserialize, Serialize};

use crate::types::Chunk;

/// Artifact format version, bumped on incompatible layout changes
pub const FORMAT_VERSION: u32 = 1;

/// One embedded chunk inside an index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Embedding vector
    pub embedding: Vec<f32>,
    /// The chunk this vector was computed from
    pub chunk: Chunk,
}

/// A search hit with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is more similar)
    pub similarity: f32,
}

/// A namespace's searchable embedding store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Artifact format version
    pub format_version: u32,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Embedded chunks
    pub entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from embedded chunks
    pub fn new(dimensions: usize, entries: Vec<IndexEntry>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            dimensions,
            entries,
        }
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nearest-neighbor lookup: top `k` entries by cosine similarity
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                similarity: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity between two vectors
///
/// Mismatched lengths and zero vectors score 0.0 rather than panicking;
/// they indicate an embedding-model mismatch the caller must fix.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;

    fn entry(embedding: Vec<f32>, content: &str) -> IndexEntry {
        IndexEntry {
            embedding,
            chunk: Chunk::new(content, ChunkMetadata::text(1)),
        }
    }

    #[test]
    fn search_ranks_by_similarity() {
        let index = VectorIndex::new(
            2,
            vec![
                entry(vec![1.0, 0.0], "east"),
                entry(vec![0.0, 1.0], "north"),
                entry(vec![0.7, 0.7], "northeast"),
            ],
        );

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "east");
        assert_eq!(results[1].chunk.content, "northeast");
        assert!(results[0].similarity > results[1].similarity);
    }

    #[test]
    fn search_truncates_to_k() {
        let index = VectorIndex::new(
            2,
            (0..10).map(|i| entry(vec![i as f32, 1.0], "c")).collect(),
        );
        assert_eq!(index.search(&[1.0, 1.0], 3).len(), 3);
    }

    #[test]
    fn zero_and_mismatched_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
