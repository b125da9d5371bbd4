//! HTTP gateway to the retrieval/answering backend.
//!
//! One outbound call per operation, each with its own bounded wait; no
//! retries, no backoff. Every transport and protocol fault surfaces as a
//! `GatewayError` so nothing past this boundary panics.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::config;
use crate::protocol::{
    HealthStatus, IngestAck, IngestRequest, QueryAnswer, QueryRequest, SourceDocument,
};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Backend is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Backend returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    Parsing(String),

    #[error("Ambiguous backend payload: {0}")]
    Protocol(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// HTTP client for the documentation backend.
pub struct BackendGateway {
    base_url: String,
    client: reqwest::Client,
    query_timeout_secs: u64,
    ingest_timeout_secs: u64,
}

impl BackendGateway {
    /// Create a gateway for the given base address.
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            query_timeout_secs: config::QUERY_TIMEOUT_SECS,
            ingest_timeout_secs: config::INGEST_TIMEOUT_SECS,
        }
    }

    /// Gateway for the backend address configured in the environment.
    pub fn from_env() -> Self {
        Self::new(&config::backend_base_url())
    }

    /// For testing: short budgets so timeout behavior is observable.
    #[cfg(test)]
    pub fn with_timeouts(
        base_url: &str,
        query_timeout_secs: u64,
        ingest_timeout_secs: u64,
    ) -> Self {
        let mut gateway = Self::new(base_url);
        gateway.query_timeout_secs = query_timeout_secs;
        gateway.ingest_timeout_secs = ingest_timeout_secs;
        gateway
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one query along with the accumulated history pairs.
    ///
    /// Callers must reject empty prompts before this point; the gateway
    /// sends whatever it is handed.
    pub async fn query(
        &self,
        prompt: &str,
        history: &[(String, String)],
        num_docs: u32,
    ) -> Result<QueryAnswer, GatewayError> {
        let url = format!("{}/run", self.base_url);
        let body = QueryRequest {
            query: prompt,
            num_docs,
            chat_history: history,
        };

        tracing::debug!(history_len = history.len(), "Sending query to backend");

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.query_timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.query_timeout_secs))?;

        let raw: RawQueryResponse = Self::read_json(response).await?;
        raw.into_answer()
    }

    /// Hand one URL to the backend for ingestion.
    ///
    /// Success means accepted, not completed: the crawl runs out-of-band and
    /// its completion is never reported through this client.
    pub async fn ingest(&self, url: &str) -> Result<IngestAck, GatewayError> {
        let endpoint = format!("{}/ingest", self.base_url);
        let body = IngestRequest { url };

        tracing::debug!(url, "Requesting ingestion");

        let response = self
            .client
            .post(&endpoint)
            .timeout(Duration::from_secs(self.ingest_timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e, self.ingest_timeout_secs))?;

        let raw: RawIngestResponse = Self::read_json(response).await?;
        raw.into_ack()
    }

    /// Probe backend liveness.
    pub async fn health(&self) -> Result<HealthStatus, GatewayError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(config::HEALTH_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| self.map_send_error(e, config::HEALTH_TIMEOUT_SECS))?;

        Self::read_json(response).await
    }

    fn map_send_error(&self, e: reqwest::Error, timeout_secs: u64) -> GatewayError {
        if e.is_connect() {
            GatewayError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            GatewayError::Timeout(timeout_secs)
        } else {
            GatewayError::Http(e.to_string())
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Parsing(e.to_string()))
    }
}

/// Raw response body from POST /run, before shape validation.
#[derive(Deserialize)]
struct RawQueryResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    source_documents: Option<Vec<SourceDocument>>,
    #[serde(default)]
    error: Option<String>,
}

impl RawQueryResponse {
    /// Enforce the tagged contract: exactly one of `result` or `error`.
    fn into_answer(self) -> Result<QueryAnswer, GatewayError> {
        match (self.result, self.error) {
            (Some(_), Some(_)) => Err(GatewayError::Protocol(
                "both result and error present".to_string(),
            )),
            (None, None) => Err(GatewayError::Protocol(
                "neither result nor error present".to_string(),
            )),
            (None, Some(error)) => Err(GatewayError::Backend(error)),
            (Some(result), None) => Ok(QueryAnswer {
                result,
                source_documents: self.source_documents.unwrap_or_default(),
                query: self.query,
            }),
        }
    }
}

/// Raw response body from POST /ingest.
#[derive(Deserialize)]
struct RawIngestResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RawIngestResponse {
    fn into_ack(self) -> Result<IngestAck, GatewayError> {
        if let Some(error) = self.error {
            return Err(GatewayError::Backend(error));
        }
        Ok(IngestAck {
            status: self.status,
            message: self.message,
            url: self.url,
        })
    }
}
