//! Query request types and mode routing

use serde::{Deserialize, Serialize};

/// A single message from the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role ("user", "assistant", ...)
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Answer-generation strategy selected per query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Multi-modal RAG with document context and history
    SmartChat,
    /// Focused extraction of specific document details
    DocumentAnalysis,
    /// Financial calculations and trend analysis
    AnalyticalInsights,
    /// Chat without document context
    GeneralConversation,
}

impl QueryMode {
    /// Parse the wire-format mode string
    ///
    /// Unrecognized values fall back to `SmartChat`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Smart_Chat" => Self::SmartChat,
            "Document_Analysis" => Self::DocumentAnalysis,
            "Analytical_Insights" => Self::AnalyticalInsights,
            "General_Conversation" => Self::GeneralConversation,
            other => {
                tracing::warn!("Unknown query mode '{}', falling back to Smart_Chat", other);
                Self::SmartChat
            }
        }
    }

    /// Whether this mode retrieves document context before answering
    pub fn requires_namespaces(&self) -> bool {
        !matches!(self, Self::GeneralConversation)
    }
}

/// Query request from the calling backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub question: String,

    /// Previous messages in the conversation
    #[serde(rename = "chatHistory", default)]
    pub chat_history: Vec<ChatMessage>,

    /// Document namespaces to search
    #[serde(rename = "vectorNamespaces", default)]
    pub namespaces: Vec<String>,

    /// Conversation mode (Smart_Chat, Document_Analysis, ...)
    #[serde(rename = "featureUsed", default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    "Smart_Chat".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_known_values() {
        assert_eq!(QueryMode::parse("Smart_Chat"), QueryMode::SmartChat);
        assert_eq!(
            QueryMode::parse("Document_Analysis"),
            QueryMode::DocumentAnalysis
        );
        assert_eq!(
            QueryMode::parse("Analytical_Insights"),
            QueryMode::AnalyticalInsights
        );
        assert_eq!(
            QueryMode::parse("General_Conversation"),
            QueryMode::GeneralConversation
        );
    }

    #[test]
    fn unknown_mode_falls_back_to_smart_chat() {
        assert_eq!(QueryMode::parse("bogus"), QueryMode::SmartChat);
        assert_eq!(QueryMode::parse(""), QueryMode::SmartChat);
    }

    #[test]
    fn only_general_conversation_skips_retrieval() {
        assert!(QueryMode::SmartChat.requires_namespaces());
        assert!(QueryMode::DocumentAnalysis.requires_namespaces());
        assert!(QueryMode::AnalyticalInsights.requires_namespaces());
        assert!(!QueryMode::GeneralConversation.requires_namespaces());
    }
}
