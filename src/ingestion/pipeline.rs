//! Background document ingestion
//!
//! Runs after the HTTP handler has already acknowledged the request, so
//! every outcome is reported through the status notifier instead of a
//! return value.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::index::IndexStore;
use crate::notify::StatusNotifier;
use crate::types::ProcessDocumentRequest;

use super::extractor::ChunkExtractor;

/// Extracts a document into chunks and builds its namespace index
pub struct IngestionPipeline {
    extractor: Arc<ChunkExtractor>,
    store: Arc<IndexStore>,
    notifier: Arc<dyn StatusNotifier>,
}

impl IngestionPipeline {
    /// Create a new pipeline
    pub fn new(
        extractor: Arc<ChunkExtractor>,
        store: Arc<IndexStore>,
        notifier: Arc<dyn StatusNotifier>,
    ) -> Self {
        Self {
            extractor,
            store,
            notifier,
        }
    }

    /// Process one document end to end, reporting the outcome
    pub async fn run(&self, request: ProcessDocumentRequest) {
        tracing::info!(
            "Processing document {} ({}) into namespace {}",
            request.document_id,
            request.file_name,
            request.namespace
        );

        match self.ingest(&request).await {
            Ok(chunk_count) => {
                tracing::info!(
                    "Document {} processed: {} chunks indexed",
                    request.document_id,
                    chunk_count
                );
                self.notifier.notify_processed(&request.document_id).await;
            }
            Err(e) => {
                tracing::error!("Document {} failed: {}", request.document_id, e);
                self.notifier
                    .notify_failed(&request.document_id, &e.to_string())
                    .await;
            }
        }
    }

    async fn ingest(&self, request: &ProcessDocumentRequest) -> Result<usize> {
        let chunks = self.extractor.extract(Path::new(&request.file_path)).await?;
        self.store.create(&chunks, &request.namespace).await?;
        Ok(chunks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::providers::{EmbeddingProvider, VisionProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubVision;

    #[async_trait]
    impl VisionProvider for StubVision {
        async fn describe_image(&self, _image: &[u8]) -> crate::error::Result<String> {
            Ok("a chart".to_string())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Notifier that records every status delivery
    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl StatusNotifier for RecordingNotifier {
        async fn notify_processed(&self, document_id: &str) {
            self.events
                .lock()
                .unwrap()
                .push((document_id.to_string(), "processed".to_string()));
        }

        async fn notify_failed(&self, document_id: &str, error_message: &str) {
            self.events
                .lock()
                .unwrap()
                .push((document_id.to_string(), format!("failed: {}", error_message)));
        }
    }

    fn pipeline_in(
        dir: &std::path::Path,
    ) -> (IngestionPipeline, Arc<IndexStore>, Arc<RecordingNotifier>) {
        let extractor = Arc::new(ChunkExtractor::new(
            &ChunkingConfig::default(),
            Arc::new(StubVision),
        ));
        let store = Arc::new(
            IndexStore::new(dir.to_path_buf(), Arc::new(StubEmbedder)).unwrap(),
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let pipeline = IngestionPipeline::new(extractor, store.clone(), notifier.clone());
        (pipeline, store, notifier)
    }

    /// One-page PDF with the given text drawn in Helvetica
    fn write_sample_pdf(path: &std::path::Path, text: &str) {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document as PdfDocument, Object, Stream};

        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn request(file_path: &str) -> ProcessDocumentRequest {
        ProcessDocumentRequest {
            document_id: "doc-42".to_string(),
            file_path: file_path.to_string(),
            file_name: "report.pdf".to_string(),
            namespace: "ns-42".to_string(),
        }
    }

    #[tokio::test]
    async fn pdf_is_ingested_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.pdf");
        let text = "Total assets grew nine percent during the fiscal year. ".repeat(60);
        write_sample_pdf(&file, &text);

        let (pipeline, store, notifier) = pipeline_in(dir.path());
        pipeline.run(request(file.to_str().unwrap())).await;

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], ("doc-42".to_string(), "processed".to_string()));

        match store.load("ns-42").await {
            crate::index::LoadOutcome::Found(index) => {
                assert!(index.len() >= 2, "expected multiple chunks, got {}", index.len());
                for entry in &index.entries {
                    assert!(entry.chunk.content.len() <= 1000);
                    assert!(!entry.chunk.content.is_empty());
                    assert_eq!(entry.chunk.metadata.page, 1);
                }
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_file_reports_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _, notifier) = pipeline_in(dir.path());

        pipeline.run(request("/nonexistent/report.pdf")).await;

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "doc-42");
        assert!(events[0].1.starts_with("failed:"));
    }

    #[tokio::test]
    async fn invalid_pdf_reports_failed_status() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bogus.pdf");
        std::fs::write(&file, b"this is not a pdf").unwrap();

        let (pipeline, _, notifier) = pipeline_in(dir.path());
        pipeline.run(request(file.to_str().unwrap())).await;

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].1.starts_with("failed:"));
    }
}
