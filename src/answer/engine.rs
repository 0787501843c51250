//! Answer synthesis: routes queries by mode and drives the LLM

use std::sync::Arc;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::retrieval::RetrievalEngine;
use crate::types::{ChatMessage, Chunk, QueryMode, QueryRequest};

use super::prompt::PromptBuilder;

/// Returned when any stage of answering fails
const FALLBACK_MESSAGE: &str =
    "I encountered an error while processing your question. Please try again or rephrase your question.";

/// Fixed reply when a document-grounded mode is invoked with no namespaces
fn no_document_message(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::DocumentAnalysis => "Please upload a document to analyze.",
        QueryMode::AnalyticalInsights => "Please upload financial documents to analyze.",
        _ => "I need documents to answer your question. Please upload a document first.",
    }
}

/// Fixed reply when retrieval finds nothing relevant
fn no_context_message(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::DocumentAnalysis => "No relevant information found in the document.",
        QueryMode::AnalyticalInsights => "No relevant financial data found in the documents.",
        _ => {
            "I couldn't find relevant information in the uploaded documents to answer your question."
        }
    }
}

/// Synthesizes answers from retrieved context and conversation history
pub struct AnswerEngine {
    retrieval: Arc<RetrievalEngine>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl AnswerEngine {
    /// Create a new answer engine
    pub fn new(retrieval: Arc<RetrievalEngine>, llm: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self {
            retrieval,
            llm,
            top_k,
        }
    }

    /// Answer a query, never surfacing an error to the caller
    ///
    /// Any internal failure degrades to a fixed apology so the chat
    /// surface always receives a usable answer string.
    pub async fn answer(&self, request: &QueryRequest) -> String {
        let mode = QueryMode::parse(&request.mode);
        tracing::info!(
            "Answering query in mode {:?} across {} namespace(s)",
            mode,
            request.namespaces.len()
        );

        match self.answer_inner(request, mode).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Failed to answer query: {}", e);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    async fn answer_inner(&self, request: &QueryRequest, mode: QueryMode) -> Result<String> {
        if mode.requires_namespaces() && request.namespaces.is_empty() {
            return Ok(no_document_message(mode).to_string());
        }

        match mode {
            QueryMode::GeneralConversation => {
                self.general_conversation(&request.question, &request.chat_history)
                    .await
            }
            QueryMode::SmartChat => {
                let chunks = self.retrieve(request).await?;
                if chunks.is_empty() {
                    return Ok(no_context_message(mode).to_string());
                }
                let context = PromptBuilder::format_context(&chunks);
                let history = PromptBuilder::format_history(&request.chat_history);
                let prompt = PromptBuilder::smart_chat(&request.question, &context, &history);
                self.llm.generate(&prompt).await
            }
            QueryMode::DocumentAnalysis => {
                let chunks = self.retrieve(request).await?;
                if chunks.is_empty() {
                    return Ok(no_context_message(mode).to_string());
                }
                let context = PromptBuilder::format_context(&chunks);
                let prompt = PromptBuilder::document_analysis(&request.question, &context);
                self.llm.generate(&prompt).await
            }
            QueryMode::AnalyticalInsights => {
                let chunks = self.retrieve(request).await?;
                if chunks.is_empty() {
                    return Ok(no_context_message(mode).to_string());
                }
                let context = PromptBuilder::format_context(&chunks);
                let prompt = PromptBuilder::analytical_insights(&request.question, &context);
                self.llm.generate(&prompt).await
            }
        }
    }

    async fn retrieve(&self, request: &QueryRequest) -> Result<Vec<Chunk>> {
        self.retrieval
            .search(&request.question, &request.namespaces, self.top_k)
            .await
    }

    async fn general_conversation(
        &self,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String> {
        let history = PromptBuilder::format_history(history);
        let prompt = PromptBuilder::general_conversation(question, &history);
        self.llm.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::index::IndexStore;
    use crate::providers::EmbeddingProvider;
    use crate::types::{Chunk, ChunkMetadata};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, text.len() as f32])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    /// LLM stub that records prompts; fails every call when `fail` is set
    struct StubLlm {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StubLlm {
        fn new(fail: bool) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn call_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(Error::llm("model unavailable"))
            } else {
                Ok("stub answer".to_string())
            }
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    struct Harness {
        engine: AnswerEngine,
        llm: Arc<StubLlm>,
        embedder: Arc<CountingEmbedder>,
        _dir: tempfile::TempDir,
    }

    async fn harness(namespaces: &[(&str, &[&str])], llm_fails: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let store =
            Arc::new(IndexStore::new(dir.path().to_path_buf(), embedder.clone()).unwrap());

        for (namespace, contents) in namespaces {
            let chunks: Vec<Chunk> = contents
                .iter()
                .map(|c| Chunk::new(*c, ChunkMetadata::text(1)))
                .collect();
            store.create(&chunks, namespace).await.unwrap();
        }
        embedder.calls.store(0, Ordering::SeqCst);

        let retrieval = Arc::new(RetrievalEngine::new(store, embedder.clone()));
        let llm = Arc::new(StubLlm::new(llm_fails));
        let engine = AnswerEngine::new(retrieval, llm.clone() as Arc<dyn LlmProvider>, 5);

        Harness {
            engine,
            llm,
            embedder,
            _dir: dir,
        }
    }

    fn request(question: &str, namespaces: &[&str], mode: &str) -> QueryRequest {
        QueryRequest {
            question: question.to_string(),
            chat_history: Vec::new(),
            namespaces: namespaces.iter().map(|s| s.to_string()).collect(),
            mode: mode.to_string(),
        }
    }

    #[tokio::test]
    async fn smart_chat_grounds_answer_in_retrieved_context() {
        let h = harness(&[("doc-1", &["Q4 revenue was $2.3M"])], false).await;

        let answer = h
            .engine
            .answer(&request("What was revenue?", &["doc-1"], "Smart_Chat"))
            .await;

        assert_eq!(answer, "stub answer");
        assert_eq!(h.llm.call_count(), 1);
        let prompt = h.llm.last_prompt();
        assert!(prompt.contains("[Page 1] Q4 revenue was $2.3M"));
        assert!(prompt.contains("What was revenue?"));
        assert!(prompt.contains("No previous conversation."));
    }

    #[tokio::test]
    async fn document_modes_without_namespaces_return_guidance() {
        let expectations = [
            (
                "Smart_Chat",
                "I need documents to answer your question. Please upload a document first.",
            ),
            ("Document_Analysis", "Please upload a document to analyze."),
            (
                "Analytical_Insights",
                "Please upload financial documents to analyze.",
            ),
        ];

        for (mode, expected) in expectations {
            let h = harness(&[], false).await;
            let answer = h.engine.answer(&request("question", &[], mode)).await;
            assert_eq!(answer, expected);
            assert_eq!(h.llm.call_count(), 0);
            assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn empty_retrieval_short_circuits_before_llm() {
        let expectations = [
            (
                "Smart_Chat",
                "I couldn't find relevant information in the uploaded documents to answer your question.",
            ),
            (
                "Document_Analysis",
                "No relevant information found in the document.",
            ),
            (
                "Analytical_Insights",
                "No relevant financial data found in the documents.",
            ),
        ];

        for (mode, expected) in expectations {
            let h = harness(&[], false).await;
            let answer = h
                .engine
                .answer(&request("question", &["never-ingested"], mode))
                .await;

            assert_eq!(answer, expected);
            assert_eq!(h.llm.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn general_conversation_never_touches_retrieval() {
        let h = harness(&[("doc-1", &["content"])], false).await;

        let answer = h
            .engine
            .answer(&request("What is a P/E ratio?", &[], "General_Conversation"))
            .await;

        assert_eq!(answer, "stub answer");
        assert_eq!(h.embedder.calls.load(Ordering::SeqCst), 0);
        assert!(h.llm.last_prompt().contains("What is a P/E ratio?"));
        assert!(!h.llm.last_prompt().contains("### CONTEXT ###"));
    }

    #[tokio::test]
    async fn unknown_mode_routes_like_smart_chat() {
        let h = harness(&[("doc-1", &["annual report text"])], false).await;

        h.engine
            .answer(&request("question", &["doc-1"], "Definitely_Not_A_Mode"))
            .await;

        assert_eq!(h.llm.call_count(), 1);
        assert!(h.llm.last_prompt().contains("### CHAT HISTORY ###"));
        assert!(h.llm.last_prompt().contains("[Page 1] annual report text"));
    }

    #[tokio::test]
    async fn llm_failure_degrades_to_apology() {
        let h = harness(&[("doc-1", &["content"])], true).await;

        let answer = h
            .engine
            .answer(&request("question", &["doc-1"], "Smart_Chat"))
            .await;

        assert!(answer.starts_with("I encountered an error"));
    }

    #[tokio::test]
    async fn analysis_modes_omit_history() {
        let h = harness(&[("doc-1", &["balance sheet details"])], false).await;

        h.engine
            .answer(&request("Summarize assets", &["doc-1"], "Document_Analysis"))
            .await;

        assert!(!h.llm.last_prompt().contains("### CHAT HISTORY ###"));
        assert!(h.llm.last_prompt().contains("document analyst"));
    }
}
