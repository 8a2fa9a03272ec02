#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The session service bootstrapped against the static plugin.

use std::sync::Arc;

use clinic_security::{CanonicalRole, PermissionSet};
use serde_json::json;
use session::{BootstrapPhase, MemoryTokenPersistence, SessionConfig, SessionService};
use session_sdk::{TokenPersistence, TransportHeaders};
use static_identity_plugin::StaticIdentityPlugin;
use static_identity_plugin::config::{IdentityMode, StaticIdentityPluginConfig, TokenMapping};

fn plugin_config() -> StaticIdentityPluginConfig {
    StaticIdentityPluginConfig {
        mode: IdentityMode::StaticTokens,
        tokens: vec![
            TokenMapping {
                token: "doctor-token".to_owned(),
                response: json!({
                    "data": {
                        "user": { "id": "d-1", "userType": "DOCTOR_SENIOR" },
                        "permissions": ["appointments.view"]
                    }
                }),
            },
            TokenMapping {
                token: "admin-token".to_owned(),
                response: json!({ "id": "a-1", "role": "Administrator" }),
            },
        ],
        ..StaticIdentityPluginConfig::default()
    }
}

fn service_with(token: Option<&str>) -> (SessionService, Arc<MemoryTokenPersistence>) {
    let persistence = Arc::new(MemoryTokenPersistence::new());
    if let Some(token) = token {
        persistence.store("auth_token", token).unwrap();
    }
    let transport = Arc::new(TransportHeaders::new());
    let fetch = StaticIdentityPlugin::new()
        .init(&plugin_config(), Arc::clone(&transport))
        .unwrap();

    let svc = SessionService::new(
        SessionConfig::default(),
        persistence.clone(),
        transport,
        fetch,
    );
    (svc, persistence)
}

#[tokio::test]
async fn mapped_token_resolves_to_its_identity() {
    let (svc, _) = service_with(Some("doctor-token"));

    assert_eq!(svc.bootstrap().await, BootstrapPhase::Authenticated);
    let state = svc.snapshot();
    assert_eq!(state.role, CanonicalRole::Doctor);
    assert_eq!(state.permissions, PermissionSet::from(["appointments.view"]));
}

#[tokio::test]
async fn direct_user_body_gets_universal_permissions() {
    let (svc, _) = service_with(Some("admin-token"));

    assert_eq!(svc.bootstrap().await, BootstrapPhase::Authenticated);
    let state = svc.snapshot();
    assert_eq!(state.role, CanonicalRole::Admin);
    assert!(state.permissions.is_universal());
}

#[tokio::test]
async fn unknown_token_is_cleared() {
    let (svc, persistence) = service_with(Some("forged"));

    assert_eq!(svc.bootstrap().await, BootstrapPhase::Unauthenticated);
    assert!(persistence.load("auth_token").unwrap().is_none());
    assert!(svc.transport().bearer_token().is_none());
}
