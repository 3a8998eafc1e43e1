use crate::error::{ApiError, ApiResult};
use dogecert_core::Credentials;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Request fields in insertion order.
pub type Payload = serde_json::Map<String, Value>;

/// Scheme prefix of the `Authorization` header.
pub const AUTH_SCHEME: &str = "TOKEN";

/// How the payload is encoded into the request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyMode {
    /// `key=value&key2=value2`
    #[default]
    Form,
    /// Compact JSON document.
    Json,
}

impl BodyMode {
    pub fn content_type(&self) -> &'static str {
        match self {
            BodyMode::Form => "application/x-www-form-urlencoded",
            BodyMode::Json => "application/json",
        }
    }
}

/// Encode `payload` into the exact bytes that will be signed and sent.
pub fn encode_body(payload: &Payload, mode: BodyMode) -> ApiResult<String> {
    match mode {
        BodyMode::Json => {
            serde_json::to_string(payload).map_err(|e| ApiError::Encode(e.to_string()))
        }
        BodyMode::Form => {
            let mut pairs = Vec::with_capacity(payload.len());
            for (key, value) in payload {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(ApiError::Encode(format!(
                            "field '{key}' is not a scalar and cannot be form-encoded"
                        )));
                    }
                };
                pairs.push((key.as_str(), text));
            }
            serde_urlencoded::to_string(pairs).map_err(|e| ApiError::Encode(e.to_string()))
        }
    }
}

/// Lowercase hex HMAC-SHA1 of `path + "\n" + body` under `secret`.
pub fn sign(secret: &str, path: &str, body: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(path.as_bytes());
    mac.update(b"\n");
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// `TOKEN <access_key>:<signature>`
pub fn authorization(access_key: &str, signature: &str) -> String {
    format!("{AUTH_SCHEME} {access_key}:{signature}")
}

/// A fully prepared call. `body` is the single source for both the
/// signature input and the bytes on the wire.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub path: String,
    pub content_type: &'static str,
    pub authorization: String,
    pub body: String,
}

impl SignedRequest {
    pub fn build(
        credentials: &Credentials,
        api_base: &str,
        path: &str,
        payload: &Payload,
        mode: BodyMode,
    ) -> ApiResult<Self> {
        let body = encode_body(payload, mode)?;
        let signature = sign(&credentials.secret_key, path, &body);
        Ok(Self {
            url: format!("{}{}", api_base.trim_end_matches('/'), path),
            path: path.to_string(),
            content_type: mode.content_type(),
            authorization: authorization(&credentials.access_key, &signature),
            body,
        })
    }

    /// Message the signature was computed over.
    pub fn signing_input(&self) -> String {
        format!("{}\n{}", self.path, self.body)
    }
}
