//! Index store: one persisted artifact per namespace
//!
//! The store does not support incremental mutation; any change to a
//! namespace is a full rebuild (delete + recreate). Concurrent create or
//! delete on the same namespace is the caller's responsibility to avoid;
//! different namespaces never share files.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

use super::vector::{IndexEntry, VectorIndex, FORMAT_VERSION};

/// Result of loading a namespace's index
///
/// `NotFound` is a routine condition (not-yet-processed or deleted
/// documents); `Corrupt` is exceptional and carries the underlying error.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Artifact existed and deserialized cleanly
    Found(VectorIndex),
    /// No artifact for this namespace
    NotFound,
    /// Artifact exists but cannot be used
    Corrupt(String),
}

/// Persistent mapping from namespace to vector index
pub struct IndexStore {
    /// Root directory holding one artifact per namespace
    root_dir: PathBuf,
    /// Embedding provider used for all index builds
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IndexStore {
    /// Create a new store rooted at `root_dir`
    pub fn new(root_dir: PathBuf, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        std::fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir, embedder })
    }

    /// Artifact path for a namespace
    ///
    /// Namespaces become file names directly, so anything that could
    /// escape the root directory is rejected.
    fn artifact_path(&self, namespace: &str) -> Result<PathBuf> {
        if namespace.is_empty()
            || namespace.contains('/')
            || namespace.contains('\\')
            || namespace.contains("..")
        {
            return Err(Error::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.root_dir.join(format!("{}.index.json", namespace)))
    }

    /// Embed all chunks, build a new index, and persist it
    ///
    /// Overwrites any existing index under the namespace. Fails with
    /// `Error::IndexBuild` if `chunks` is empty or embedding fails.
    pub async fn create(&self, chunks: &[Chunk], namespace: &str) -> Result<()> {
        let path = self.artifact_path(namespace)?;

        if chunks.is_empty() {
            return Err(Error::IndexBuild(format!(
                "No chunks to index for namespace {}",
                namespace
            )));
        }

        tracing::info!(
            "Creating index for namespace {} ({} chunks)",
            namespace,
            chunks.len()
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| Error::IndexBuild(format!("Embedding failed: {}", e)))?;

        let entries: Vec<IndexEntry> = embeddings
            .into_iter()
            .zip(chunks.iter().cloned())
            .map(|(embedding, chunk)| IndexEntry { embedding, chunk })
            .collect();

        let index = VectorIndex::new(self.embedder.dimensions(), entries);
        let content = serde_json::to_vec(&index)?;

        // Write-then-rename keeps readers of the old artifact consistent
        // and confines a crash mid-write to the temp file.
        let tmp_path = path.with_extension("index.json.tmp");
        tokio::fs::write(&tmp_path, &content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::info!("Index persisted: {}", path.display());
        Ok(())
    }

    /// Load a namespace's index from disk
    pub async fn load(&self, namespace: &str) -> LoadOutcome {
        let path = match self.artifact_path(namespace) {
            Ok(path) => path,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };

        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::NotFound,
            Err(e) => return LoadOutcome::Corrupt(e.to_string()),
        };

        match serde_json::from_slice::<VectorIndex>(&content) {
            Ok(index) if index.format_version == FORMAT_VERSION => LoadOutcome::Found(index),
            Ok(index) => LoadOutcome::Corrupt(format!(
                "Unsupported artifact version {} for namespace {}",
                index.format_version, namespace
            )),
            Err(e) => LoadOutcome::Corrupt(format!(
                "Artifact for namespace {} is corrupt: {}",
                namespace, e
            )),
        }
    }

    /// Remove a namespace's artifact
    ///
    /// Idempotent: returns whether anything was actually removed.
    pub async fn delete(&self, namespace: &str) -> Result<bool> {
        let path = self.artifact_path(namespace)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Index deleted: {}", namespace);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether an artifact exists for the namespace, without loading
    pub fn exists(&self, namespace: &str) -> bool {
        self.artifact_path(namespace)
            .map(|path| path.exists())
            .unwrap_or(false)
    }
}
