//! Core domain types for docrelay invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// InvocationId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one handler invocation (time-sortable).
///
/// Carried through tracing spans and sent to the collaborators as the
/// `opc-request-id` header so a failed invocation can be correlated with
/// provider-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    /// Generate a new time-sortable invocation identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InvocationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// IngestionJob
// ---------------------------------------------------------------------------

/// The data-ingestion job created by the knowledge-base refresh call.
///
/// The job runs asynchronously on the managed platform; only its identity
/// and lifecycle state at creation time are retained here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJob {
    /// Provider-assigned job identifier.
    pub id: String,
    /// Provider-defined lifecycle state at creation (e.g. `ACCEPTED`).
    pub lifecycle_state: String,
    /// When the provider created the job, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_created: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// HandlerResponse
// ---------------------------------------------------------------------------

/// The one JSON payload every invocation terminates in.
///
/// Serializes as `{"status":"success",...}` / `{"status":"skipped"}` /
/// `{"status":"failed",...}`; the handler boundary never lets anything
/// else escape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HandlerResponse {
    /// A PDF was processed end to end.
    Success {
        /// The uploaded PDF's object name.
        pdf: String,
        /// The written `.txt` object's name.
        output_file: String,
    },
    /// The uploaded object was not a PDF; nothing was done.
    Skipped,
    /// Decoding or one of the remote calls failed.
    Failed {
        /// String representation of the error.
        error: String,
    },
}

impl HandlerResponse {
    /// Build a `failed` response from any displayable error.
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_id_roundtrip() {
        let id = InvocationId::new();
        let s = id.to_string();
        let parsed: InvocationId = s.parse().expect("parse InvocationId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn success_response_shape() {
        let resp = HandlerResponse::Success {
            pdf: "report.pdf".into(),
            output_file: "report.txt".into(),
        };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "pdf": "report.pdf",
                "output_file": "report.txt",
            })
        );
    }

    #[test]
    fn skipped_response_shape() {
        let json = serde_json::to_string(&HandlerResponse::Skipped).expect("serialize");
        assert_eq!(json, r#"{"status":"skipped"}"#);
    }

    #[test]
    fn failed_response_shape() {
        let resp = HandlerResponse::failed("agent error: HTTP 503");
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "agent error: HTTP 503");
    }

    #[test]
    fn response_deserializes_by_status_tag() {
        let parsed: HandlerResponse =
            serde_json::from_str(r#"{"status":"skipped"}"#).expect("deserialize");
        assert_eq!(parsed, HandlerResponse::Skipped);
    }

    #[test]
    fn ingestion_job_roundtrips() {
        let job = IngestionJob {
            id: "job-1".into(),
            lifecycle_state: "ACCEPTED".into(),
            time_created: Some(Utc::now()),
        };
        let json = serde_json::to_string(&job).expect("serialize");
        let parsed: IngestionJob = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.id, "job-1");
        assert_eq!(parsed.lifecycle_state, "ACCEPTED");
        assert!(parsed.time_created.is_some());
    }
}
