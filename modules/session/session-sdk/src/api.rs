//! Public API trait for identity resolution.
//!
//! The session service consumes this trait; the module ships a local
//! implementation that wraps the remote identity fetch.

use async_trait::async_trait;

use crate::error::IdentityResolverError;
use crate::models::ResolvedIdentity;

/// Resolves the current session's identity into its canonical form.
///
/// ```ignore
/// let identity = resolver.resolve().await?;
/// let allowed = clinic_security::can_access(&required, &identity.permissions);
/// ```
#[async_trait]
pub trait IdentityResolverClient: Send + Sync {
    /// Fetch the identity behind the currently applied credential and
    /// normalize it.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the backend rejects the session or reports an
    ///   application-level error
    /// - `ServiceUnavailable` if the backend cannot be reached or times out
    /// - `Malformed` if the payload carries no usable user object
    /// - `Internal` for unexpected errors
    async fn resolve(&self) -> Result<ResolvedIdentity, IdentityResolverError>;
}
