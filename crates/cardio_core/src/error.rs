//! Typed errors for the pipeline and its collaborators.

use thiserror::Error;

/// Persistence failure in the record or credential store.
///
/// Fatal to the current submission: the orchestrator never attempts remote
/// analysis on unpersisted data.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Remote analysis failure. Every variant is recovered uniformly by the
/// orchestrator's local fallback; the split exists for log observability
/// only.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to analysis provider failed: {0}")]
    Request(String),

    #[error("analysis provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

/// Credential store failure, surfaced as a user-facing message.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Store(#[from] StoreError),
}
