//! Document ingestion: PDF extraction, chunking, index construction

mod extractor;
mod pipeline;
mod splitter;

pub use extractor::ChunkExtractor;
pub use pipeline::IngestionPipeline;
pub use splitter::RecursiveTextSplitter;
