//! Configuration for the static identity plugin.

use serde::Deserialize;
use serde_json::{Value, json};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticIdentityPluginConfig {
    /// Answering mode.
    pub mode: IdentityMode,

    /// Identity body returned in `accept_all` mode.
    pub default_identity: Value,

    /// Static token-to-body mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,
}

impl Default for StaticIdentityPluginConfig {
    fn default() -> Self {
        Self {
            mode: IdentityMode::AcceptAll,
            default_identity: json!({
                "user": {
                    "id": "dev-user",
                    "name": "Development User",
                    "role": "admin"
                },
                "permissions": ["*"]
            }),
            tokens: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// Any non-empty token gets the default identity.
    #[default]
    AcceptAll,
    /// Only configured tokens are recognized.
    StaticTokens,
}

/// Maps a static token to a raw identity body.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    /// Body returned when this token is presented, in any shape the identity
    /// backend may use.
    pub response: Value,
}
