//! Persistence collaborators: where the delimited text goes after transform.
//!
//! - [`SimulatedIngestion`] - waits for an artificial delay and acknowledges.
//!   No network call. This is the default.
//! - [`HttpIngestion`] - POSTs the text to a data-ingestion endpoint and
//!   surfaces its acknowledgement or error.
//!
//! Neither retries. The simulated collaborator has no timeout.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{IngestError, IngestResult};
use crate::models::Acknowledgement;

/// Header carrying the client-generated receipt.
pub const UPLOAD_ID_HEADER: &str = "x-upload-id";

/// Default delay of the simulated submission.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

/// Default request timeout for the HTTP collaborator.
pub const DEFAULT_INGEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Accepts a text payload for storage.
#[async_trait]
pub trait PersistenceCollaborator: Send + Sync {
    async fn ingest(&self, text: &str) -> IngestResult<Acknowledgement>;

    /// Short name for logs.
    fn describe(&self) -> String;
}

// =============================================================================
// Simulated
// =============================================================================

/// Stand-in collaborator: sleeps, then acknowledges.
#[derive(Debug, Clone)]
pub struct SimulatedIngestion {
    delay: Duration,
}

impl SimulatedIngestion {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedIngestion {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl PersistenceCollaborator for SimulatedIngestion {
    async fn ingest(&self, text: &str) -> IngestResult<Acknowledgement> {
        tokio::time::sleep(self.delay).await;
        Ok(Acknowledgement {
            receipt: Uuid::new_v4().to_string(),
            accepted_bytes: text.len(),
            received_at: Utc::now(),
            detail: None,
            simulated: true,
        })
    }

    fn describe(&self) -> String {
        format!("simulated ({}ms delay)", self.delay.as_millis())
    }
}

// =============================================================================
// HTTP
// =============================================================================

/// Collaborator that POSTs `text/csv` to an ingestion endpoint.
#[derive(Debug, Clone)]
pub struct HttpIngestion {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpIngestion {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> IngestResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::Http(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PersistenceCollaborator for HttpIngestion {
    async fn ingest(&self, text: &str) -> IngestResult<Acknowledgement> {
        let receipt = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/csv; charset=utf-8")
            .header(UPLOAD_ID_HEADER, &receipt)
            .body(text.to_string())
            .send()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IngestError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(IngestError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let detail = Some(body.trim().to_string()).filter(|b| !b.is_empty());

        Ok(Acknowledgement {
            receipt,
            accepted_bytes: text.len(),
            received_at: Utc::now(),
            detail,
            simulated: false,
        })
    }

    fn describe(&self) -> String {
        format!("http POST {}", self.endpoint)
    }
}
