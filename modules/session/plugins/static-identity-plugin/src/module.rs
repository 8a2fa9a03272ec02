//! Static identity plugin module.

use std::sync::{Arc, OnceLock};

use session_sdk::{IdentityFetchClient, TransportHeaders};
use tracing::{info, warn};

use crate::config::{IdentityMode, StaticIdentityPluginConfig};
use crate::domain::{Service, StaticIdentityClient};

/// Static identity plugin.
///
/// Initialized once from configuration; hands out an [`IdentityFetchClient`]
/// bound to the shared transport headers.
#[derive(Default)]
pub struct StaticIdentityPlugin {
    client: OnceLock<Arc<StaticIdentityClient>>,
}

impl StaticIdentityPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service from `cfg` and bind it to `transport`.
    ///
    /// # Errors
    ///
    /// Fails if the plugin was already initialized.
    pub fn init(
        &self,
        cfg: &StaticIdentityPluginConfig,
        transport: Arc<TransportHeaders>,
    ) -> anyhow::Result<Arc<dyn IdentityFetchClient>> {
        info!("Initializing static_identity_plugin");

        if cfg.mode == IdentityMode::AcceptAll {
            warn!(
                "Static identity plugin is running in `accept_all` mode: \
                 every bearer token resolves to the default identity. \
                 Do NOT use this mode in production."
            );
        }
        info!(mode = ?cfg.mode, token_count = cfg.tokens.len(), "Loaded plugin configuration");

        let service = Arc::new(Service::from_config(cfg));
        let client = Arc::new(StaticIdentityClient::new(service, transport));
        self.client
            .set(Arc::clone(&client))
            .map_err(|_| anyhow::anyhow!("Static identity plugin already initialized"))?;

        info!("Static identity plugin initialized");
        Ok(client)
    }

    /// The client, once initialized.
    #[must_use]
    pub fn client(&self) -> Option<Arc<dyn IdentityFetchClient>> {
        self.client
            .get()
            .map(|client| Arc::clone(client) as Arc<dyn IdentityFetchClient>)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn init_is_single_shot() {
        let plugin = StaticIdentityPlugin::new();
        assert!(plugin.client().is_none());

        let cfg = StaticIdentityPluginConfig::default();
        plugin.init(&cfg, Arc::new(TransportHeaders::new())).unwrap();
        assert!(plugin.client().is_some());

        assert!(plugin.init(&cfg, Arc::new(TransportHeaders::new())).is_err());
    }
}
