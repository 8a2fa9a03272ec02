//! Domain errors for the session module.

use std::time::Duration;

use session_sdk::{IdentityFetchError, IdentityResolverError};

/// Internal domain errors raised while resolving an identity.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("identity fetch failed: {0}")]
    Fetch(#[from] IdentityFetchError),

    #[error("identity backend reported an error: {0}")]
    Application(String),

    #[error("malformed identity response: {0}")]
    MalformedResponse(String),

    #[error("identity fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl DomainError {
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }
}

impl From<DomainError> for IdentityResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Fetch(IdentityFetchError::Unauthorized(msg))
            | DomainError::Application(msg) => Self::Unauthenticated(msg),
            DomainError::Fetch(IdentityFetchError::Transport(msg)) => Self::ServiceUnavailable(msg),
            DomainError::Fetch(IdentityFetchError::Malformed(msg))
            | DomainError::MalformedResponse(msg) => Self::Malformed(msg),
            DomainError::Timeout(limit) => {
                Self::ServiceUnavailable(format!("identity fetch timed out after {limit:?}"))
            }
            DomainError::Fetch(IdentityFetchError::Internal(msg)) => Self::Internal(msg),
        }
    }
}

/// Errors returned to callers of explicit session actions.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The credential was empty.
    #[error("credential is empty")]
    EmptyCredential,

    /// The identity behind the credential could not be resolved. The session
    /// has been cleared.
    #[error("login rejected: {0}")]
    Rejected(#[from] IdentityResolverError),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_api_errors() {
        let cases = [
            (
                DomainError::Fetch(IdentityFetchError::Unauthorized("expired".to_owned())),
                "unauthenticated: expired",
            ),
            (
                DomainError::Application("locked".to_owned()),
                "unauthenticated: locked",
            ),
            (
                DomainError::Fetch(IdentityFetchError::Transport("reset".to_owned())),
                "service unavailable: reset",
            ),
            (
                DomainError::malformed("user is not an object"),
                "malformed identity: user is not an object",
            ),
            (
                DomainError::Timeout(Duration::from_secs(5)),
                "service unavailable: identity fetch timed out after 5s",
            ),
            (
                DomainError::Fetch(IdentityFetchError::Internal("client dropped".to_owned())),
                "internal error: client dropped",
            ),
        ];

        for (domain, expected) in cases {
            assert_eq!(IdentityResolverError::from(domain).to_string(), expected);
        }
    }
}
