//! REST clients for the three managed collaborators: the data-ingestion
//! service, the agent runtime, and object storage.
//!
//! Each client is constructed per invocation from the resolved
//! [`HandlerConfig`](docrelay_shared::HandlerConfig) and issues exactly one
//! call: no retry, no backoff, no client-side timeout beyond the transport's
//! own defaults. A bearer token is attached when one is configured, and every
//! request carries the invocation id as `opc-request-id` for provider-side
//! correlation.

pub mod agent;
pub mod ingestion;
pub mod object_storage;

use docrelay_shared::{DocRelayError, Result};
use reqwest::Client;

pub use agent::AgentClient;
pub use ingestion::{IngestionClient, JOB_DESCRIPTION, JOB_DISPLAY_NAME};
pub use object_storage::ObjectStorageClient;

/// Maximum number of redirects any client follows.
const MAX_REDIRECTS: usize = 3;

/// User-Agent string for collaborator requests.
const USER_AGENT: &str = concat!("docrelay/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with the shared settings.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
        .map_err(|e| DocRelayError::config(format!("failed to build HTTP client: {e}")))
}

/// Validate a configured base URL and strip any trailing slash.
pub(crate) fn normalize_base_url(raw: &str, service: &str) -> Result<String> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| DocRelayError::config(format!("invalid {service} base URL '{raw}': {e}")))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// First 200 characters of an error body, for error messages.
pub(crate) fn body_excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}
