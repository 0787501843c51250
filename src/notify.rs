//! Status callbacks to the document-owning backend
//!
//! Ingestion runs in the background, so the backend that accepted the
//! upload learns the outcome via a PATCH to its document-status endpoint.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::config::NotifyConfig;
use crate::error::Result;

/// Receives document processing outcomes
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    /// Report that a document was processed successfully
    async fn notify_processed(&self, document_id: &str);

    /// Report that document processing failed
    async fn notify_failed(&self, document_id: &str, error_message: &str);
}

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
}

/// Notifier that PATCHes the backend's document-status endpoint
///
/// Delivery is best-effort: a failed callback is logged and dropped, it
/// never fails the ingestion that triggered it.
pub struct WebhookNotifier {
    client: reqwest::Client,
    base_url: String,
}

impl WebhookNotifier {
    /// Create a notifier from configuration
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn patch_status(&self, document_id: &str, body: &StatusBody<'_>) {
        let url = format!("{}/api/v1/documents/{}/status", self.base_url, document_id);

        match self.client.patch(&url).json(body).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Status '{}' delivered for document {}", body.status, document_id);
            }
            Ok(response) => {
                tracing::warn!(
                    "Status callback for document {} rejected: HTTP {}",
                    document_id,
                    response.status()
                );
            }
            Err(e) => {
                tracing::warn!("Status callback for document {} failed: {}", document_id, e);
            }
        }
    }
}

#[async_trait]
impl StatusNotifier for WebhookNotifier {
    async fn notify_processed(&self, document_id: &str) {
        self.patch_status(
            document_id,
            &StatusBody {
                status: "processed",
                error_message: None,
            },
        )
        .await;
    }

    async fn notify_failed(&self, document_id: &str, error_message: &str) {
        self.patch_status(
            document_id,
            &StatusBody {
                status: "failed",
                error_message: Some(error_message),
            },
        )
        .await;
    }
}
