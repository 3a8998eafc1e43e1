use crate::error::{DeployError, DomainError};
use dogecert_client::CertId;
use dogecert_core::DeployPolicy;

/// Result of binding the certificate to one domain.
#[derive(Debug)]
pub struct DomainOutcome {
    pub domain: String,
    pub result: Result<(), DomainError>,
}

impl DomainOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub cert_id: CertId,
    /// Empty when no domains were configured.
    pub outcomes: Vec<DomainOutcome>,
}

impl RunReport {
    pub fn upload_only(cert_id: CertId) -> Self {
        Self {
            cert_id,
            outcomes: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.domain.as_str())
            .collect()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.domain.as_str())
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(DomainOutcome::is_success)
    }

    /// Apply `policy` to the per-domain outcomes.
    pub fn verdict(self, policy: DeployPolicy) -> Result<RunReport, DeployError> {
        let failed = self.failed();
        if policy.fails_run(failed.len()) {
            return Err(DeployError::DomainsFailed {
                failed: failed.into_iter().map(str::to_string).collect(),
                cert_id: self.cert_id,
            });
        }
        Ok(self)
    }
}
