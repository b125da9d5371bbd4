//! Wire types for the documentation backend's HTTP contract.
//!
//! Field names, including the capitalized `Metadata` and `PageContent` keys
//! on retrieved documents, follow the backend's JSON encoding exactly.
//! Everything beyond the contract is optional so responses parse leniently.

use serde::{Deserialize, Serialize};

/// Fallback acknowledgement when the backend omits its ingest message.
pub const DEFAULT_INGEST_ACK: &str = "Ingestion started!";

/// Request body for POST /run.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub num_docs: u32,
    /// (role, content) pairs, oldest first; serializes as `[[role, content], ...]`.
    pub chat_history: &'a [(String, String)],
}

/// Request body for POST /ingest.
#[derive(Debug, Serialize)]
pub struct IngestRequest<'a> {
    pub url: &'a str,
}

/// A unit of retrieved evidence. Opaque except for the source identifier
/// inside its metadata mapping.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDocument {
    #[serde(rename = "Metadata", default)]
    pub metadata: DocumentMetadata,
    #[serde(rename = "PageContent", default)]
    pub page_content: Option<String>,
}

impl SourceDocument {
    /// For testing: build a document carrying just a source identifier.
    #[cfg(test)]
    pub fn from_source(source: &str) -> Self {
        Self {
            metadata: DocumentMetadata {
                source: Some(source.to_string()),
            },
            page_content: None,
        }
    }
}

/// Metadata mapping attached to a retrieved document. The backend may add
/// arbitrary keys; only `source` matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub source: Option<String>,
}

/// Validated success payload from POST /run.
#[derive(Debug, Clone)]
pub struct QueryAnswer {
    pub result: String,
    pub source_documents: Vec<SourceDocument>,
    /// Echo of the submitted query; logged, never displayed.
    pub query: Option<String>,
}

/// Acknowledgement for an accepted ingestion hand-off.
///
/// Receipt means the backend accepted the URL, not that the source is
/// searchable yet.
#[derive(Debug, Clone)]
pub struct IngestAck {
    pub status: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
}

impl IngestAck {
    /// Operator-facing acknowledgement, with the standard fallback.
    pub fn ack_message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_INGEST_ACK)
    }
}

/// Response body from GET /health.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}
