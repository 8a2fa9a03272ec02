//! Service implementation for the static identity plugin.

use std::collections::HashMap;

use serde_json::{Value, json};

use crate::config::{IdentityMode, StaticIdentityPluginConfig};

/// Body returned for tokens the plugin does not recognize.
///
/// Shaped like a backend that answers `200` with an application-level error.
#[must_use]
pub fn invalid_token_body() -> Value {
    json!({ "success": false, "error": "invalid token" })
}

/// Static identity service.
///
/// - `accept_all`: any non-empty token maps to the default identity
/// - `static_tokens`: specific tokens map to specific bodies
pub struct Service {
    mode: IdentityMode,
    default_identity: Value,
    token_map: HashMap<String, Value>,
}

impl Service {
    #[must_use]
    pub fn from_config(cfg: &StaticIdentityPluginConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.response.clone()))
            .collect();

        Self {
            mode: cfg.mode,
            default_identity: cfg.default_identity.clone(),
            token_map,
        }
    }

    /// Identity body for `bearer_token`, or `None` if the token is empty.
    #[must_use]
    pub fn identity_for(&self, bearer_token: &str) -> Option<Value> {
        if bearer_token.is_empty() {
            return None;
        }

        let body = match self.mode {
            IdentityMode::AcceptAll => self.default_identity.clone(),
            IdentityMode::StaticTokens => self
                .token_map
                .get(bearer_token)
                .cloned()
                .unwrap_or_else(invalid_token_body),
        };
        Some(body)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::TokenMapping;

    fn static_tokens() -> StaticIdentityPluginConfig {
        StaticIdentityPluginConfig {
            mode: IdentityMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "patient-token".to_owned(),
                response: json!({ "id": "p-1", "type": "patient" }),
            }],
            ..StaticIdentityPluginConfig::default()
        }
    }

    #[test]
    fn accept_all_returns_default_identity() {
        let service = Service::from_config(&StaticIdentityPluginConfig::default());

        let body = service.identity_for("anything").unwrap();
        assert_eq!(body["user"]["id"], "dev-user");
        assert_eq!(body["permissions"], json!(["*"]));
    }

    #[test]
    fn empty_token_has_no_identity() {
        let service = Service::from_config(&StaticIdentityPluginConfig::default());
        assert!(service.identity_for("").is_none());
        assert!(Service::from_config(&static_tokens()).identity_for("").is_none());
    }

    #[test]
    fn static_tokens_returns_mapped_body() {
        let service = Service::from_config(&static_tokens());
        assert_eq!(
            service.identity_for("patient-token"),
            Some(json!({ "id": "p-1", "type": "patient" }))
        );
    }

    #[test]
    fn unknown_token_gets_application_error_body() {
        let service = Service::from_config(&static_tokens());
        assert_eq!(service.identity_for("forged"), Some(invalid_token_body()));
    }
}
