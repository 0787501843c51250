//! Chunk types with page-level provenance

use serde::{Deserialize, Serialize};

/// Origin of a chunk's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Extracted page text
    Text,
    /// AI-generated description of an embedded image
    Image,
}

/// Provenance metadata attached to every chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Page number (1-indexed)
    pub page: u32,
    /// Content type
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// Origin tag ("pdf_text" or "pdf_image")
    pub source: String,
    /// Index of the image on its page (image chunks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_index: Option<u32>,
}

impl ChunkMetadata {
    /// Metadata for a page-text chunk
    pub fn text(page: u32) -> Self {
        Self {
            page,
            kind: ChunkKind::Text,
            source: "pdf_text".to_string(),
            image_index: None,
        }
    }

    /// Metadata for an image-description chunk
    pub fn image(page: u32, image_index: u32) -> Self {
        Self {
            page,
            kind: ChunkKind::Image,
            source: "pdf_image".to_string(),
            image_index: Some(image_index),
        }
    }
}

/// The atomic retrievable unit: a bounded segment of extracted content
///
/// Chunks are immutable after creation and persisted only inside a
/// namespace's vector index, never independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content (never empty)
    pub content: String,
    /// Provenance metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}
