use crate::domain::DomainSet;
use crate::error::{CoreError, CoreResult};
use crate::policy::DeployPolicy;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix for plain environment overrides (`DOGECERT_SECRET_KEY`).
pub const ENV_PREFIX: &str = "DOGECERT_";

/// Environment prefix a GitHub Actions runner uses for step inputs.
pub const ACTION_INPUT_PREFIX: &str = "INPUT_";

/// Run configuration, read once at startup and immutable afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub access_key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub secret_key: String,
    #[serde(default)]
    pub fullchain_file: PathBuf,
    #[serde(default)]
    pub key_file: PathBuf,
    /// Whitespace-separated domain list. Empty means upload only.
    #[serde(default, deserialize_with = "lenient_string")]
    pub domains: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Note attached to the uploaded certificate.
    #[serde(default = "default_note", deserialize_with = "lenient_string")]
    pub note: String,
    #[serde(default)]
    pub deploy_policy: DeployPolicy,
}

/// Values given explicitly on the command line. `None` leaves lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullchain_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deploy_policy: Option<DeployPolicy>,
}

/// Access key / secret key pair used to sign every request.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_api_base() -> String { "https://api.dogecloud.com".into() }
fn default_timeout() -> u64 { 30 }
fn default_note() -> String { "我的证书".into() }

/// Accept scalars that an environment provider may have parsed as numbers.
fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        UInt(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(de)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

/// Map a GitHub Actions input name onto a config field.
fn action_input_field(input: &str) -> Option<&'static str> {
    match input.to_ascii_lowercase().as_str() {
        "accesskey" | "access-key" => Some("access_key"),
        "secretkey" | "secret-key" => Some("secret_key"),
        "fullchain-file" => Some("fullchain_file"),
        "key-file" => Some("key_file"),
        "domains" => Some("domains"),
        "api-base" => Some("api_base"),
        "timeout" => Some("timeout_secs"),
        "note" => Some("note"),
        "deploy-policy" => Some("deploy_policy"),
        _ => None,
    }
}

// ── Impls ─────────────────────────────────────────────────────

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            fullchain_file: PathBuf::new(),
            key_file: PathBuf::new(),
            domains: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
            note: default_note(),
            deploy_policy: DeployPolicy::default(),
        }
    }
}

impl DeployConfig {
    /// Layered sources, lowest precedence first: defaults, YAML file,
    /// `DOGECERT_*` env, GitHub Actions `INPUT_*` env, command-line overrides.
    pub fn figment(file: Option<&Path>, overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(DeployConfig::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(action_inputs())
            .merge(Serialized::defaults(overrides))
    }

    /// Load and validate. A named config file that does not exist is an error.
    pub fn load(file: Option<&Path>, overrides: &ConfigOverrides) -> CoreResult<Self> {
        if let Some(path) = file
            && !path.exists()
        {
            return Err(CoreError::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let config: DeployConfig = Self::figment(file, overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could only fail later, before touching disk or network.
    pub fn validate(&self) -> CoreResult<()> {
        if self.access_key.trim().is_empty() {
            return Err(CoreError::Config("access key is required".into()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(CoreError::Config("secret key is required".into()));
        }
        if self.fullchain_file.as_os_str().is_empty() {
            return Err(CoreError::Config("fullchain file path is required".into()));
        }
        if self.key_file.as_os_str().is_empty() {
            return Err(CoreError::Config("private key file path is required".into()));
        }
        if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
            return Err(CoreError::Config(format!(
                "api base '{}' must be an http(s) URL",
                self.api_base
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeout must be at least one second".into()));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
        }
    }

    pub fn domain_set(&self) -> DomainSet {
        DomainSet::parse(&self.domains)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `INPUT_*` variables, skipping unset ones: a runner exports every declared
/// input, so an empty value must not clobber a lower layer.
fn action_inputs() -> Env {
    Env::prefixed(ACTION_INPUT_PREFIX).filter_map(|key| {
        let field = action_input_field(key.as_str())?;
        let set = std::env::var(format!("{ACTION_INPUT_PREFIX}{key}"))
            .is_ok_and(|v| !v.trim().is_empty());
        set.then(|| field.into())
    })
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("fullchain_file", &self.fullchain_file)
            .field("key_file", &self.key_file)
            .field("domains", &self.domains)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("note", &self.note)
            .field("deploy_policy", &self.deploy_policy)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
