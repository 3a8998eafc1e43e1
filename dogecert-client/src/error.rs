use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single API call.
///
/// `Transport` covers everything below the response envelope: connection
/// failures, timeouts, non-2xx HTTP statuses and bodies that do not decode.
/// `Application` is a well-formed envelope whose `code` is not 200.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error")]
    Transport(#[source] reqwest::Error),

    #[error("API error {code}: {msg}")]
    Application { code: i64, msg: String },

    #[error("Cannot encode request body: {0}")]
    Encode(String),

    #[error("Response payload is missing field '{field}'")]
    MissingField { field: &'static str },

    #[error("Cannot build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Envelope code, when the remote side answered with one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Application { code, .. } => Some(*code),
            _ => None,
        }
    }
}
