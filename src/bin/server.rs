//! RAG server binary
//!
//! Run with: cargo run --bin finchat-rag-server

use finchat_rag::{config::RagConfig, providers::OllamaClient, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finchat_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("FINCHAT_RAG_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            RagConfig::from_file(&path)?
        }
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Vision model: {}", config.llm.vision_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Index root: {}", config.index.root_dir.display());

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let ollama = OllamaClient::new(&config.llm, config.embeddings.dimensions)?;
    if ollama.health_check().await? {
        tracing::info!("Ollama is running");
    } else {
        tracing::warn!("Ollama not available at {}", config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!(
            "  2. Pull models: ollama pull {} && ollama pull {} && ollama pull {}",
            config.llm.embed_model,
            config.llm.generate_model,
            config.llm.vision_model
        );
    }

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /process-document - Ingest an uploaded PDF");
    println!("  POST /query            - Ask a question");
    println!("  POST /delete-document  - Delete a document");
    println!("  POST /delete-documents - Delete several documents");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
