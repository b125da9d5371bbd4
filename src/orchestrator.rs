//! Composition of the session protocol: validate, query, format, commit.

use async_trait::async_trait;
use thiserror::Error;

use crate::gateway::{BackendGateway, GatewayError};
use crate::protocol::{IngestAck, QueryAnswer};
use crate::session::ConversationSession;
use crate::sources::format_citations;

/// Retrieval depth requested from the backend on every query. Orchestration
/// policy, not operator-controlled.
const NUM_DOCS: u32 = 5;

/// Errors surfaced to the operator by the orchestration layer.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("URL must not be empty")]
    EmptyUrl,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Backend operations the orchestrator depends on.
#[async_trait]
pub trait AssistantBackend {
    async fn query(
        &self,
        prompt: &str,
        history: &[(String, String)],
        num_docs: u32,
    ) -> Result<QueryAnswer, GatewayError>;

    async fn ingest(&self, url: &str) -> Result<IngestAck, GatewayError>;
}

#[async_trait]
impl AssistantBackend for BackendGateway {
    async fn query(
        &self,
        prompt: &str,
        history: &[(String, String)],
        num_docs: u32,
    ) -> Result<QueryAnswer, GatewayError> {
        BackendGateway::query(self, prompt, history, num_docs).await
    }

    async fn ingest(&self, url: &str) -> Result<IngestAck, GatewayError> {
        BackendGateway::ingest(self, url).await
    }
}

/// Drives one submission end to end.
///
/// Flow: validate → snapshot history → query backend → format citations →
/// commit the exchange. A failed query leaves the session exactly as it was
/// before the attempt.
pub struct QueryOrchestrator<'a, B: AssistantBackend> {
    backend: &'a B,
}

impl<'a, B: AssistantBackend> QueryOrchestrator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Submit one prompt against the session's accumulated context.
    ///
    /// Returns the display-formatted answer that was committed. The history
    /// sent to the backend is the history as it stood before this exchange:
    /// the new turn pair is appended only after the backend answers.
    pub async fn submit(
        &self,
        session: &mut ConversationSession,
        prompt: &str,
    ) -> Result<String, AssistantError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AssistantError::EmptyPrompt);
        }

        let history = session.history_pairs();

        let answer = self.backend.query(prompt, &history, NUM_DOCS).await?;
        if let Some(echo) = &answer.query {
            tracing::debug!(echo = %echo, "Backend echoed query");
        }

        let citations = format_citations(&answer.source_documents);
        let display_answer = format!("{}\n\n{}", answer.result, citations);

        session.append_exchange(prompt, &display_answer, &answer.result);
        tracing::info!(
            session_id = %session.id(),
            exchanges = session.exchange_count(),
            sources = answer.source_documents.len(),
            "Exchange committed"
        );

        Ok(display_answer)
    }

    /// Hand a documentation URL to the backend for ingestion. Blank input
    /// never reaches the network.
    pub async fn ingest(&self, url: &str) -> Result<IngestAck, AssistantError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AssistantError::EmptyUrl);
        }

        Ok(self.backend.ingest(url).await?)
    }
}
