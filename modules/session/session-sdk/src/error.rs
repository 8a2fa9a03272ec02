//! Error types for the session module contracts.

use thiserror::Error;

/// Errors reported by a remote identity fetch backend.
#[derive(Debug, Error)]
pub enum IdentityFetchError {
    /// The backend rejected the credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request did not complete (connection, DNS, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors that can occur when using the identity resolver API.
#[derive(Debug, Error)]
pub enum IdentityResolverError {
    /// The identity backend rejected the session or flagged an application error.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The identity backend could not be reached in time.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The identity payload did not have a usable shape.
    #[error("malformed identity: {0}")]
    Malformed(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors from the persisted token storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Persistence is not available in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be used by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}
