//! Configuration for the session module.

use std::time::Duration;

use clinic_security::CanonicalRole;
use serde::Deserialize;

use crate::domain::resolver::MissingPermissionsPolicy;
use crate::domain::token_store::DEFAULT_TOKEN_KEY;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Skip credential recovery and identity resolution entirely.
    ///
    /// The bootstrap synthesizes an authenticated session with a placeholder
    /// user and universal permissions, and the authentication gate always
    /// passes. For environments without a live identity backend.
    pub auth_disabled: bool,

    /// Role of the placeholder user while `auth_disabled` is set.
    pub auth_disabled_role: CanonicalRole,

    /// Storage key of the persisted credential.
    pub token_key: String,

    /// Route the authentication gate redirects to.
    pub login_route: String,

    /// Query parameter carrying the location to return to after login.
    pub return_to_param: String,

    /// Destination after login when no usable `return_to_param` is present.
    pub home_route: String,

    /// What to grant when the identity payload carries no permission list.
    pub missing_permissions: MissingPermissionsPolicy,

    /// Upper bound on the identity fetch, e.g. `"10s"`. Unbounded when unset.
    #[serde(default, with = "humantime_serde")]
    pub identity_fetch_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auth_disabled: false,
            auth_disabled_role: CanonicalRole::Patient,
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            login_route: "/login".to_owned(),
            return_to_param: "returnTo".to_owned(),
            home_route: "/".to_owned(),
            missing_permissions: MissingPermissionsPolicy::default(),
            identity_fetch_timeout: None,
        }
    }
}
