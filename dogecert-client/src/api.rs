use crate::client::DogeCloudClient;
use crate::error::{ApiError, ApiResult};
use crate::sign::{BodyMode, Payload};
use async_trait::async_trait;
use dogecert_core::CertBundle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const UPLOAD_PATH: &str = "/cdn/cert/upload.json";
pub const DOMAIN_CONFIG_PATH: &str = "/cdn/domain/config.json";

/// Certificate identifier returned by the upload endpoint.
///
/// Opaque: it is passed back exactly as received, number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CertId {
    Number(i64),
    Text(String),
}

impl CertId {
    /// Extract `id` from an upload response payload.
    pub fn from_payload(data: &Value) -> ApiResult<Self> {
        match data.get("id") {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(CertId::Number)
                .ok_or(ApiError::MissingField { field: "id" }),
            Some(Value::String(s)) if !s.is_empty() => Ok(CertId::Text(s.clone())),
            _ => Err(ApiError::MissingField { field: "id" }),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            CertId::Number(n) => Value::from(*n),
            CertId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for CertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertId::Number(n) => write!(f, "{n}"),
            CertId::Text(s) => f.write_str(s),
        }
    }
}

/// `/cdn/domain/config.json?domain=<domain>`, with the domain percent-encoded.
pub fn domain_config_path(domain: &str) -> ApiResult<String> {
    let query = serde_urlencoded::to_string(&[("domain", domain)][..])
        .map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(format!("{DOMAIN_CONFIG_PATH}?{query}"))
}

/// Certificate operations the deploy flow needs from the CDN.
#[async_trait]
pub trait CdnApi: Send + Sync {
    /// Upload a certificate bundle and return its id.
    async fn upload_certificate(&self, note: &str, bundle: &CertBundle) -> ApiResult<CertId>;

    /// Point `domain`'s HTTPS configuration at `cert_id`.
    async fn bind_certificate(&self, domain: &str, cert_id: &CertId) -> ApiResult<()>;
}

#[async_trait]
impl CdnApi for DogeCloudClient {
    async fn upload_certificate(&self, note: &str, bundle: &CertBundle) -> ApiResult<CertId> {
        let mut payload = Payload::new();
        payload.insert("note".into(), Value::from(note));
        payload.insert("cert".into(), Value::from(bundle.fullchain.as_str()));
        payload.insert("private".into(), Value::from(bundle.private_key.as_str()));

        let data = self.call(UPLOAD_PATH, &payload, BodyMode::Form).await?;
        CertId::from_payload(&data)
    }

    async fn bind_certificate(&self, domain: &str, cert_id: &CertId) -> ApiResult<()> {
        let mut payload = Payload::new();
        payload.insert("cert_id".into(), cert_id.to_value());

        let path = domain_config_path(domain)?;
        self.call(&path, &payload, BodyMode::Json).await?;
        Ok(())
    }
}
