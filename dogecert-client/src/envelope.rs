use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The only envelope code that means success. Independent of the HTTP status.
pub const SUCCESS_CODE: i64 = 200;

/// Response wrapper shared by every DogeCloud endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
}

/// `"msg": null` shows up on some error responses; treat it like a missing field.
fn null_as_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

impl Envelope {
    /// Unwrap to `data`, or an application error carrying `msg` and `code`.
    pub fn into_data(self) -> ApiResult<Value> {
        if self.code != SUCCESS_CODE {
            return Err(ApiError::Application {
                code: self.code,
                msg: self.msg,
            });
        }
        Ok(self.data)
    }
}
