//! Error types shared by the store implementations.

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::DomainError;

/// Convenient result alias returning [`StoreError`] failures.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures that can occur while talking to the remote collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The store answered with a non-success status.
    #[error("unexpected response status {status} for `{path}`: {body}")]
    RequestStatus {
        path: String,
        status: StatusCode,
        body: String,
    },
    /// Response payload could not be decoded.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// A write that should return the affected row returned none.
    #[error("`{table}` returned no row for {filter}")]
    MissingRow { table: &'static str, filter: String },
    /// Realtime channel is closed or rejected the message.
    #[error("realtime channel error: {0}")]
    Channel(String),
    /// The in-process backend refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),
    /// Invalid domain input.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
