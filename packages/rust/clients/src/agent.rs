//! Agent query client.
//!
//! One request/response exchange with the configured agent endpoint. The
//! question is free text and the answer comes back as free text; nothing
//! validates the answer's structure or length, the caller stores it
//! verbatim.

use docrelay_shared::{DocRelayError, HandlerConfig, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{body_excerpt, build_client, normalize_base_url};

/// Chat request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    user_message: &'a str,
    should_stream: bool,
}

/// Chat response body (fields we consume).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    text: String,
}

/// Client for the agent runtime.
#[derive(Debug)]
pub struct AgentClient {
    http: reqwest::Client,
    base_url: String,
    endpoint_id: String,
    auth_token: Option<String>,
}

impl AgentClient {
    /// Build a client from the resolved handler config.
    pub fn new(config: &HandlerConfig) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base_url: normalize_base_url(&config.agent_base_url, "agent")?,
            endpoint_id: config.agent_endpoint_id.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Ask the agent a free-text question and return its raw answer text.
    #[instrument(skip(self, question), fields(endpoint = %self.endpoint_id))]
    pub async fn ask(&self, question: &str, request_id: &str) -> Result<String> {
        let url = format!(
            "{}/20240531/agentEndpoints/{}/actions/chat",
            self.base_url, self.endpoint_id
        );
        let body = ChatRequest {
            user_message: question,
            should_stream: false,
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
            .map_err(|e| DocRelayError::Agent(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocRelayError::Agent(format!(
                "{url}: HTTP {status}: {}",
                body_excerpt(&body)
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| DocRelayError::Agent(format!("{url}: invalid response: {e}")))?;

        debug!(answer_len = chat.message.content.text.len(), "agent answered");

        Ok(chat.message.content.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docrelay_shared::AppConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str) -> HandlerConfig {
        let mut config = AppConfig::default();
        config.oci.agent_endpoint_id = "ep-1".into();
        config.endpoints.agent_url = Some(base.to_string());
        HandlerConfig::resolve_with(&config, |_| None)
    }

    #[tokio::test]
    async fn asks_question_and_returns_answer_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/20240531/agentEndpoints/ep-1/actions/chat"))
            .and(body_partial_json(serde_json::json!({
                "userMessage": "Extract details from the doc report.pdf",
                "shouldStream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"content": {"text": "Extracted: foo"}},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AgentClient::new(&test_config(&server.uri())).unwrap();
        let answer = client
            .ask("Extract details from the doc report.pdf", "req-1")
            .await
            .unwrap();

        assert_eq!(answer, "Extracted: foo");
    }

    #[tokio::test]
    async fn service_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/20240531/agentEndpoints/ep-1/actions/chat"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = AgentClient::new(&test_config(&server.uri())).unwrap();
        let err = client.ask("question", "req-1").await.expect_err("503");

        assert!(matches!(err, DocRelayError::Agent(_)));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn answer_missing_text_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/20240531/agentEndpoints/ep-1/actions/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": {}})),
            )
            .mount(&server)
            .await;

        let client = AgentClient::new(&test_config(&server.uri())).unwrap();
        let err = client.ask("question", "req-1").await.expect_err("no text");

        assert!(matches!(err, DocRelayError::Agent(_)));
    }
}
