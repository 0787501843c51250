//! Mode-routed answer synthesis

mod engine;
mod prompt;

pub use engine::AnswerEngine;
pub use prompt::PromptBuilder;
