use std::env;

/// Application-level constants
pub const APP_NAME: &str = "askdocs";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the backend base URL.
pub const BACKEND_URL_ENV: &str = "ASKDOCS_BACKEND_URL";

/// Backend address used when the environment does not provide one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Bounded wait for a query round-trip. Retrieval plus generation is slow,
/// so this is the long budget.
pub const QUERY_TIMEOUT_SECS: u64 = 60;

/// Bounded wait for an ingestion hand-off. The backend only acknowledges
/// acceptance; the crawl itself runs out-of-band.
pub const INGEST_TIMEOUT_SECS: u64 = 10;

/// Bounded wait for the health probe.
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Get the backend base URL from the environment, falling back to the
/// local default. Blank values count as unset.
pub fn backend_base_url() -> String {
    env::var(BACKEND_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{APP_NAME}=info")
}
