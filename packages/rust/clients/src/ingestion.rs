//! Knowledge-base refresh client.
//!
//! One POST to the data-ingestion service creating a job that re-indexes the
//! configured data source. The job itself runs asynchronously on the managed
//! platform; only its identity and initial lifecycle state come back.

use chrono::{DateTime, Utc};
use docrelay_shared::{DocRelayError, HandlerConfig, IngestionJob, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{body_excerpt, build_client, normalize_base_url};

/// Fixed display name for every refresh job.
pub const JOB_DISPLAY_NAME: &str = "Refresh KB from Object Storage";

/// Fixed description for every refresh job.
pub const JOB_DESCRIPTION: &str = "Triggered by Object Storage PDF upload";

/// Job-creation request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDataIngestionJob<'a> {
    display_name: &'a str,
    description: &'a str,
    data_source_id: &'a str,
    compartment_id: &'a str,
}

/// Job-creation response body (fields we consume).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataIngestionJobCreated {
    id: String,
    lifecycle_state: String,
    #[serde(default)]
    time_created: Option<DateTime<Utc>>,
}

/// Client for the data-ingestion service.
#[derive(Debug)]
pub struct IngestionClient {
    http: reqwest::Client,
    base_url: String,
    data_source_id: String,
    compartment_id: String,
    auth_token: Option<String>,
}

impl IngestionClient {
    /// Build a client from the resolved handler config.
    pub fn new(config: &HandlerConfig) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base_url: normalize_base_url(&config.ingestion_base_url, "ingestion")?,
            data_source_id: config.data_source_id.clone(),
            compartment_id: config.compartment_id.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Create a data-ingestion job against the configured data source.
    ///
    /// Single-shot: any transport or service failure is fatal for the
    /// invocation.
    #[instrument(skip(self), fields(data_source = %self.data_source_id))]
    pub async fn create_job(&self, request_id: &str) -> Result<IngestionJob> {
        let url = format!("{}/20240531/dataIngestionJobs", self.base_url);
        let body = CreateDataIngestionJob {
            display_name: JOB_DISPLAY_NAME,
            description: JOB_DESCRIPTION,
            data_source_id: &self.data_source_id,
            compartment_id: &self.compartment_id,
        };

        let mut request = self
            .http
            .post(&url)
            .header("opc-request-id", request_id)
            .json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocRelayError::Ingestion(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocRelayError::Ingestion(format!(
                "{url}: HTTP {status}: {}",
                body_excerpt(&body)
            )));
        }

        let created: DataIngestionJobCreated = response
            .json()
            .await
            .map_err(|e| DocRelayError::Ingestion(format!("{url}: invalid response: {e}")))?;

        info!(
            job_id = %created.id,
            lifecycle_state = %created.lifecycle_state,
            "ingestion job created"
        );

        Ok(IngestionJob {
            id: created.id,
            lifecycle_state: created.lifecycle_state,
            time_created: created.time_created,
        })
    }
}
