//! `IdentityFetchClient` backed by the static service.
//!
//! The credential is read from the shared transport headers, the same way a
//! real backend would receive it.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use session_sdk::{IdentityFetchClient, IdentityFetchError, TransportHeaders};
use tracing::debug;

use super::service::Service;

pub struct StaticIdentityClient {
    service: Arc<Service>,
    transport: Arc<TransportHeaders>,
}

impl StaticIdentityClient {
    #[must_use]
    pub fn new(service: Arc<Service>, transport: Arc<TransportHeaders>) -> Self {
        Self { service, transport }
    }
}

#[async_trait]
impl IdentityFetchClient for StaticIdentityClient {
    async fn fetch_identity(&self) -> Result<Value, IdentityFetchError> {
        let token = self
            .transport
            .bearer_token()
            .ok_or_else(|| IdentityFetchError::Unauthorized("missing bearer token".to_owned()))?;

        self.service
            .identity_for(token.expose_secret())
            .ok_or_else(|| IdentityFetchError::Unauthorized("invalid token".to_owned()))
    }

    async fn logout(&self) -> Result<(), IdentityFetchError> {
        debug!("Static identity logout");
        Ok(())
    }
}
