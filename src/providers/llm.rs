//! LLM provider traits for answer generation and image description

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text from a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Trait for multi-modal image description
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Describe raw image bytes with a fixed factual instruction prompt
    async fn describe_image(&self, image: &[u8]) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
