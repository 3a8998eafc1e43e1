use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before any request leaves the process.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error("Cannot read certificate file {}", .path.display())]
    CertFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Certificate file {} is empty", .path.display())]
    EmptyCertFile { path: PathBuf },
}

impl From<figment::Error> for CoreError {
    fn from(e: figment::Error) -> Self {
        CoreError::Figment(Box::new(e))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
