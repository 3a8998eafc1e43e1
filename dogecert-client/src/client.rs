use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::sign::{BodyMode, Payload, SignedRequest};
use dogecert_core::{Credentials, DeployConfig};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Authenticated client for one API base. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DogeCloudClient {
    http: Client,
    credentials: Credentials,
    api_base: String,
}

impl DogeCloudClient {
    pub fn new(
        credentials: Credentials,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dogecert/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self {
            http,
            credentials,
            api_base: api_base.into(),
        })
    }

    pub fn from_config(config: &DeployConfig) -> ApiResult<Self> {
        Self::new(config.credentials(), config.api_base.clone(), config.timeout())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn sign_request(
        &self,
        path: &str,
        payload: &Payload,
        mode: BodyMode,
    ) -> ApiResult<SignedRequest> {
        SignedRequest::build(&self.credentials, &self.api_base, path, payload, mode)
    }

    /// One signed POST to `path` (which may carry a query string).
    ///
    /// Returns the envelope's `data` on success. No retries.
    pub async fn call(&self, path: &str, payload: &Payload, mode: BodyMode) -> ApiResult<Value> {
        let request = self.sign_request(path, payload, mode)?;
        debug!(
            path = %path,
            mode = ?mode,
            body_bytes = request.body.len(),
            "Calling DogeCloud API"
        );
        trace!(signed_bytes = request.signing_input().len(), "Request signed");

        let response = self
            .http
            .post(&request.url)
            .header(CONTENT_TYPE, request.content_type)
            .header(AUTHORIZATION, &request.authorization)
            .body(request.body)
            .send()
            .await
            .map_err(ApiError::Transport)?
            .error_for_status()
            .map_err(ApiError::Transport)?;

        let envelope: Envelope = response.json().await.map_err(ApiError::Transport)?;
        debug!(path = %path, code = envelope.code, "DogeCloud API responded");
        envelope.into_data()
    }
}
