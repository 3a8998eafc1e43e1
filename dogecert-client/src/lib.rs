//! Signed client for the DogeCloud OpenAPI.
//!
//! Every call is a single POST whose body is signed with HMAC-SHA1 over
//! `path + "\n" + body`. The same encoded body is both signed and sent.

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;
pub mod sign;

pub use api::{CdnApi, CertId};
pub use client::DogeCloudClient;
pub use error::{ApiError, ApiResult};
pub use sign::{BodyMode, Payload, SignedRequest};
