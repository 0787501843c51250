//! Per-namespace vector index storage

mod store;
mod vector;

pub use store::{IndexStore, LoadOutcome};
pub use vector::{ScoredChunk, VectorIndex};
