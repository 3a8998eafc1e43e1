pub mod cert;
pub mod config;
pub mod domain;
pub mod error;
pub mod policy;

pub use cert::CertBundle;
pub use config::{ConfigOverrides, Credentials, DeployConfig};
pub use domain::DomainSet;
pub use error::CoreError;
pub use policy::DeployPolicy;
