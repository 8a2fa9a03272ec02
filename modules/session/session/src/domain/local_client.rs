//! Local (in-process) client for identity resolution.

use std::sync::Arc;

use async_trait::async_trait;
use session_sdk::{IdentityResolverClient, IdentityResolverError, ResolvedIdentity};

use super::{DomainError, IdentityResolver};

/// Local client wrapping the resolver service.
pub struct IdentityResolverLocalClient {
    svc: Arc<IdentityResolver>,
}

impl IdentityResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<IdentityResolver>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> IdentityResolverError {
    tracing::warn!(operation = op, error = %e, "identity resolution failed");
    e.into()
}

#[async_trait]
impl IdentityResolverClient for IdentityResolverLocalClient {
    async fn resolve(&self) -> Result<ResolvedIdentity, IdentityResolverError> {
        self.svc
            .resolve()
            .await
            .map_err(|e| log_and_convert("resolve", e))
    }
}
