pub mod deployer;
pub mod error;
pub mod report;

pub use deployer::{Deployer, run_config};
pub use error::{DeployError, DomainError};
pub use report::{DomainOutcome, RunReport};
