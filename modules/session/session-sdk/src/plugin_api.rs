//! Collaborator traits implemented outside the session core.
//!
//! Backends implement [`IdentityFetchClient`] to talk to the identity
//! service, and [`TokenPersistence`] to keep the credential between process
//! runs.

use async_trait::async_trait;

use crate::error::{IdentityFetchError, StorageError};

/// Remote identity fetch.
///
/// Calls go through the shared outbound transport, so the credential travels
/// in the transport's default `Authorization` header rather than as an
/// argument.
#[async_trait]
pub trait IdentityFetchClient: Send + Sync {
    /// Fetch the raw identity body for the current session.
    ///
    /// The body may be the user object itself, `{ user, permissions }`, or
    /// either of those wrapped in `{ data: ... }`. Application-level failures
    /// may arrive as a successful call whose body carries `success: false` or
    /// an `error` field.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the backend rejects the credential
    /// - `Transport` if the request fails
    /// - `Malformed` if the body cannot be decoded
    async fn fetch_identity(&self) -> Result<serde_json::Value, IdentityFetchError>;

    /// Terminate the session on the backend.
    ///
    /// # Errors
    ///
    /// Any backend or transport failure. Callers treat it as best-effort.
    async fn logout(&self) -> Result<(), IdentityFetchError>;
}

/// Synchronous key-value persistence for a single named string value.
pub trait TokenPersistence: Send + Sync {
    /// Load the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persistence is unavailable.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persistence is unavailable.
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persistence is unavailable.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
