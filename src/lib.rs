//! Client-side orchestration for a documentation question-answering
//! assistant: conversational session state, a gateway to the retrieval
//! backend, and deterministic citation formatting.

pub mod config;
pub mod gateway;
pub mod orchestrator;
pub mod protocol;
pub mod session;
pub mod sources;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors RUST_LOG when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
