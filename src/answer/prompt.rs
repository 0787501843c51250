//! Prompt templates and context/history formatting

use crate::types::{ChatMessage, Chunk};

/// Smart Chat: multi-modal RAG with document context and history
const SMART_CHAT_TEMPLATE: &str = r#"### ROLE ###
You are FinChatBot, an advanced financial AI assistant with document analysis capabilities.

### INSTRUCTIONS ###
1. Provide comprehensive answers based on the user's question using the provided context.
2. The context contains text excerpts and descriptions of images (charts, tables) from documents.
3. Synthesize information from all context pieces to form a complete answer.
4. If financial data is available, cite it directly with specific numbers.
5. If the context doesn't contain the answer, clearly state that the information is not available in the uploaded documents.
6. If the user asks about a specific company but the document is about a different company, clearly identify which company the document is about and politely inform the user.
7. DO NOT use external knowledge - only use the provided context.
8. Be concise but thorough in your explanations.

### CONTEXT ###
{context}

### CHAT HISTORY ###
{chat_history}

### QUESTION ###
{question}

### ANSWER ###
"#;

/// Document Analysis: focused extraction of document details
const DOCUMENT_ANALYSIS_TEMPLATE: &str = r#"### ROLE ###
You are FinChatBot, acting as a document analyst focused on extracting specific information.

### INSTRUCTIONS ###
1. Extract and summarize specific information from the document.
2. Focus on accuracy and detail.
3. Cite page numbers when available.
4. If information is not in the document, state that clearly and mention what company/topic the document is actually about.
5. If the user asks about a specific company but the document is about a different company, clearly identify which company the document covers.

### CONTEXT ###
{context}

### QUESTION ###
{question}

### ANSWER ###
"#;

/// Analytical Insights: financial calculations and trends
const ANALYTICAL_INSIGHTS_TEMPLATE: &str = r#"### ROLE ###
You are FinChatBot, acting as a financial analyst performing calculations and identifying trends.

### INSTRUCTIONS ###
1. Perform calculations based on the data in the context.
2. Identify trends, patterns, and anomalies.
3. Provide numerical analysis with specific figures.
4. Explain your reasoning clearly.
5. If the user asks about a specific company but the document is about a different company, clearly identify which company the document covers and inform the user.

### CONTEXT ###
{context}

### QUESTION ###
{question}

### ANSWER ###
"#;

/// General Conversation: no document context
const GENERAL_CONVERSATION_TEMPLATE: &str = r#"### ROLE ###
You are FinChatBot, a helpful and knowledgeable financial AI assistant.

### INSTRUCTIONS ###
1. Provide helpful, accurate information about finance topics.
2. Be conversational and friendly.
3. If you don't know something, admit it honestly.
4. Keep responses concise and easy to understand.

### CHAT HISTORY ###
{chat_history}

### QUESTION ###
{question}

### ANSWER ###
"#;

/// Renders prompt templates for the four query modes
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunks into a context block
    ///
    /// Chunk order follows retrieval order (namespace order, then
    /// per-namespace relevance); no re-sorting by page.
    pub fn format_context(chunks: &[Chunk]) -> String {
        if chunks.is_empty() {
            return "No relevant context found.".to_string();
        }

        chunks
            .iter()
            .map(|chunk| format!("[Page {}] {}", chunk.metadata.page, chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    /// Render conversation history into a readable block
    ///
    /// Empty history renders as an explicit marker so templates always
    /// have deterministic text to substitute.
    pub fn format_history(history: &[ChatMessage]) -> String {
        if history.is_empty() {
            return "No previous conversation.".to_string();
        }

        history
            .iter()
            .map(|msg| format!("{}: {}", capitalize(&msg.role), msg.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Smart Chat prompt
    pub fn smart_chat(question: &str, context: &str, history: &str) -> String {
        SMART_CHAT_TEMPLATE
            .replace("{context}", context)
            .replace("{chat_history}", history)
            .replace("{question}", question)
    }

    /// Document Analysis prompt
    pub fn document_analysis(question: &str, context: &str) -> String {
        DOCUMENT_ANALYSIS_TEMPLATE
            .replace("{context}", context)
            .replace("{question}", question)
    }

    /// Analytical Insights prompt
    pub fn analytical_insights(question: &str, context: &str) -> String {
        ANALYTICAL_INSIGHTS_TEMPLATE
            .replace("{context}", context)
            .replace("{question}", question)
    }

    /// General Conversation prompt
    pub fn general_conversation(question: &str, history: &str) -> String {
        GENERAL_CONVERSATION_TEMPLATE
            .replace("{chat_history}", history)
            .replace("{question}", question)
    }
}

/// Capitalize the first letter of a role name
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
