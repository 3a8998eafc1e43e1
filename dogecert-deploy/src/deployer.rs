use crate::error::{DeployError, DomainError};
use crate::report::{DomainOutcome, RunReport};
use dogecert_client::{CdnApi, CertId, DogeCloudClient};
use dogecert_core::{CertBundle, DeployConfig, DeployPolicy, DomainSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Uploads a certificate, then binds it to every configured domain.
///
/// The upload is awaited to completion before any deploy call starts.
/// Deploy calls run as independent tasks: one domain failing neither
/// cancels nor delays the others.
pub struct Deployer<A: CdnApi + 'static> {
    api: Arc<A>,
    note: String,
    policy: DeployPolicy,
}

impl<A: CdnApi + 'static> Deployer<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            note: DeployConfig::default().note,
            policy: DeployPolicy::default(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_policy(mut self, policy: DeployPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DeployPolicy {
        self.policy
    }

    pub async fn upload(&self, bundle: &CertBundle) -> Result<CertId, DeployError> {
        info!(note = %self.note, "Uploading certificate");
        let cert_id = self
            .api
            .upload_certificate(&self.note, bundle)
            .await
            .map_err(DeployError::Upload)?;
        info!(cert_id = %cert_id, "Certificate uploaded");
        Ok(cert_id)
    }

    /// Bind `cert_id` to every domain concurrently and wait for all of them.
    pub async fn deploy_all(&self, cert_id: &CertId, domains: &DomainSet) -> Vec<DomainOutcome> {
        let handles: Vec<_> = domains
            .iter()
            .map(|domain| {
                info!(domain = %domain, "Deploying certificate to domain");
                let api = Arc::clone(&self.api);
                let cert_id = cert_id.clone();
                let task_domain = domain.to_string();
                let handle =
                    tokio::spawn(async move { api.bind_certificate(&task_domain, &cert_id).await });
                (domain.to_string(), handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (domain, handle) in handles {
            let result = match handle.await {
                Ok(Ok(())) => {
                    info!(domain = %domain, cert_id = %cert_id, "Certificate deployed");
                    Ok(())
                }
                Ok(Err(e)) => {
                    error!(
                        domain = %domain,
                        error = &e as &dyn std::error::Error,
                        "Failed to deploy certificate to domain"
                    );
                    Err(DomainError::Api(e))
                }
                Err(e) => {
                    error!(domain = %domain, error = %e, "Deploy task for domain did not complete");
                    Err(DomainError::Aborted(e.to_string()))
                }
            };
            outcomes.push(DomainOutcome { domain, result });
        }
        outcomes
    }

    /// Upload, then deploy if any domains are configured, then apply the policy.
    pub async fn run(
        &self,
        bundle: &CertBundle,
        domains: &DomainSet,
    ) -> Result<RunReport, DeployError> {
        let cert_id = self.upload(bundle).await?;

        if domains.is_empty() {
            info!(cert_id = %cert_id, "No domains configured, skipping deployment");
            return Ok(RunReport::upload_only(cert_id));
        }

        let outcomes = self.deploy_all(&cert_id, domains).await;
        let report = RunReport { cert_id, outcomes };
        let failed = report.failed().len();
        if failed > 0 {
            warn!(
                failed,
                total = report.outcomes.len(),
                policy = %self.policy,
                "Some domains were not updated"
            );
        } else {
            info!(total = report.outcomes.len(), "Certificate deployed to all domains");
        }
        report.verdict(self.policy)
    }
}

impl Deployer<DogeCloudClient> {
    pub fn from_config(config: &DeployConfig) -> Result<Self, DeployError> {
        let client = DogeCloudClient::from_config(config).map_err(DeployError::Client)?;
        Ok(Deployer::new(Arc::new(client))
            .with_note(config.note.clone())
            .with_policy(config.deploy_policy))
    }
}

/// A whole run from configuration: validate, read the certificate files,
/// then upload and deploy. Nothing is sent if validation or file reads fail.
pub async fn run_config(config: &DeployConfig) -> Result<RunReport, DeployError> {
    config.validate()?;
    let bundle = CertBundle::load(&config.fullchain_file, &config.key_file)?;
    let domains = config.domain_set();
    info!(
        api_base = %config.api_base,
        domains = domains.len(),
        policy = %config.deploy_policy,
        "Starting certificate deployment"
    );
    Deployer::from_config(config)?.run(&bundle, &domains).await
}
