use dogecert_client::{ApiError, CertId};
use dogecert_core::CoreError;
use thiserror::Error;

/// Fatal outcome of a run.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("Cannot create API client")]
    Client(#[source] ApiError),

    #[error("Failed to upload certificate")]
    Upload(#[source] ApiError),

    #[error(
        "Certificate {cert_id} failed to deploy to {} domain(s): {}",
        .failed.len(),
        .failed.join(", ")
    )]
    DomainsFailed { cert_id: CertId, failed: Vec<String> },
}

impl DeployError {
    /// True when no deploy call was attempted before the failure.
    pub fn before_deploy(&self) -> bool {
        !matches!(self, DeployError::DomainsFailed { .. })
    }
}

/// Why a single domain could not be updated. Never fatal on its own.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("deploy task aborted: {0}")]
    Aborted(String),
}
