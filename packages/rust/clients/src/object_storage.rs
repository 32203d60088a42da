//! Object-storage writer.
//!
//! One PUT of the UTF-8 extraction text into the configured namespace and
//! bucket. Overwrite semantics: an existing object of the same name is
//! replaced.

use docrelay_shared::{DocRelayError, HandlerConfig, Result};
use tracing::{info, instrument};
use url::Url;

use crate::{body_excerpt, build_client, normalize_base_url};

/// Client for object storage.
#[derive(Debug)]
pub struct ObjectStorageClient {
    http: reqwest::Client,
    base_url: String,
    namespace: String,
    bucket: String,
    auth_token: Option<String>,
}

impl ObjectStorageClient {
    /// Build a client from the resolved handler config.
    pub fn new(config: &HandlerConfig) -> Result<Self> {
        Ok(Self {
            http: build_client()?,
            base_url: normalize_base_url(&config.storage_base_url, "object storage")?,
            namespace: config.namespace.clone(),
            bucket: config.target_bucket.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Upload UTF-8 text under the given object name, overwriting any
    /// existing object.
    #[instrument(skip(self, body), fields(bucket = %self.bucket, object = %object_name))]
    pub async fn put_object(
        &self,
        object_name: &str,
        body: &str,
        request_id: &str,
    ) -> Result<()> {
        let url = self.object_url(object_name)?;

        let mut request = self
            .http
            .put(url.clone())
            .header("opc-request-id", request_id)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body.to_string());
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocRelayError::Storage(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocRelayError::Storage(format!(
                "{url}: HTTP {status}: {}",
                body_excerpt(&body)
            )));
        }

        info!(bytes = body.len(), "object written");
        Ok(())
    }

    /// Build `{base}/n/{namespace}/b/{bucket}/o/{object}` with the object
    /// name percent-encoded as a path segment.
    fn object_url(&self, object_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| DocRelayError::Storage(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| DocRelayError::Storage("base URL cannot carry a path".into()))?
            .extend(["n", &self.namespace, "b", &self.bucket, "o", object_name]);
        Ok(url)
    }
}
