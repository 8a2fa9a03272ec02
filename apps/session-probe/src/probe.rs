//! One probe run: bootstrap, optional login, gate evaluation, optional logout.

use std::sync::Arc;

use clinic_security::{CanonicalRole, PermissionSet};
use parking_lot::Mutex;
use secrecy::SecretString;
use serde::Serialize;
use session::{
    AuthGateDecision, BootstrapPhase, FileTokenPersistence, GateRender, LogoutOutcome,
    PermissionGate, PermissionGateDecision, ProtectedRoute, RouteDecision, SessionService,
    ShellRender,
};
use session_sdk::{Router, TokenPersistence, TransportHeaders, User};
use static_identity_plugin::StaticIdentityPlugin;
use tracing::info;

use crate::config::ProbeConfig;

/// What to do after the bootstrap.
#[derive(Debug, Default)]
pub struct ProbeRequest {
    pub location: String,
    pub required: Vec<String>,
    pub has_content: bool,
    pub login: Option<SecretString>,
    pub logout: bool,
}

#[derive(Debug, Serialize)]
pub struct Navigation {
    pub kind: &'static str,
    pub to: String,
}

/// Router that records navigations instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    location: Mutex<String>,
    history: Mutex<Vec<Navigation>>,
}

impl RecordingRouter {
    #[must_use]
    pub fn at(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_owned()),
            history: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, kind: &'static str, to: &str) {
        *self.location.lock() = to.to_owned();
        self.history.lock().push(Navigation {
            kind,
            to: to.to_owned(),
        });
    }

    fn take_history(&self) -> Vec<Navigation> {
        std::mem::take(&mut *self.history.lock())
    }
}

impl Router for RecordingRouter {
    fn current_location(&self) -> String {
        self.location.lock().clone()
    }

    fn navigate(&self, to: &str) {
        self.record("navigate", to);
    }

    fn replace(&self, to: &str) {
        self.record("replace", to);
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LoginReport {
    Succeeded { destination: String },
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct GateReport {
    pub location: String,
    pub auth: AuthGateDecision,
    pub permission: Option<PermissionGateDecision>,
    pub render: GateRender,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub phase: BootstrapPhase,
    pub shell: ShellRender,
    pub authenticated: bool,
    pub user: Option<User>,
    pub role: CanonicalRole,
    pub permissions: PermissionSet,
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub bootstrap: BootstrapPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<LoginReport>,
    pub gates: GateReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout: Option<LogoutOutcome>,
    pub navigations: Vec<Navigation>,
    pub session: SessionReport,
}

/// Build the session stack from `config` and run `request` against it.
///
/// # Errors
///
/// Fails if no credential storage is available or the plugin cannot be
/// initialized.
pub async fn run(config: &ProbeConfig, request: ProbeRequest) -> anyhow::Result<ProbeReport> {
    let persistence: Arc<dyn TokenPersistence> = match &config.storage.dir {
        Some(dir) => Arc::new(FileTokenPersistence::new(dir)),
        None => Arc::new(FileTokenPersistence::in_default_location()?),
    };
    let transport = Arc::new(TransportHeaders::new());
    let fetch = StaticIdentityPlugin::new().init(&config.static_identity_plugin, Arc::clone(&transport))?;

    let svc = SessionService::new(config.session.clone(), persistence, transport, fetch);
    let router = RecordingRouter::at(&request.location);

    let bootstrap = svc.bootstrap().await;
    info!(phase = ?bootstrap, "Bootstrap finished");

    let login = match request.login {
        Some(credential) => Some(match svc.login(credential, &router).await {
            Ok(outcome) => LoginReport::Succeeded {
                destination: outcome.destination,
            },
            Err(e) => LoginReport::Failed {
                error: e.to_string(),
            },
        }),
        None => None,
    };

    let gates = evaluate_gates(&svc, &router, request.required, request.has_content);

    let logout = if request.logout {
        Some(svc.logout().await)
    } else {
        None
    };

    let snapshot = svc.snapshot();
    Ok(ProbeReport {
        bootstrap,
        login,
        gates,
        logout,
        navigations: router.take_history(),
        session: SessionReport {
            phase: svc.phase(),
            shell: svc.shell(),
            authenticated: snapshot.is_authenticated(),
            user: snapshot.user.clone(),
            role: snapshot.role,
            permissions: snapshot.permissions.clone(),
        },
    })
}

fn evaluate_gates(
    svc: &SessionService,
    router: &RecordingRouter,
    required: Vec<String>,
    has_content: bool,
) -> GateReport {
    let location = router.current_location();
    let route = ProtectedRoute::new(svc.auth_gate())
        .requiring(PermissionGate::new(required.into_iter().collect(), has_content));
    let RouteDecision {
        auth,
        permission,
        render,
    } = route.evaluate(svc.phase(), &svc.snapshot(), router);

    GateReport {
        location,
        auth,
        permission,
        render,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;
    use static_identity_plugin::config::{IdentityMode, TokenMapping};

    use super::*;
    use crate::config::StorageConfig;

    fn config(dir: &std::path::Path) -> ProbeConfig {
        let mut cfg = ProbeConfig {
            storage: StorageConfig {
                dir: Some(dir.to_path_buf()),
            },
            ..ProbeConfig::default()
        };
        cfg.static_identity_plugin.mode = IdentityMode::StaticTokens;
        cfg.static_identity_plugin.tokens = vec![TokenMapping {
            token: "nurse".to_owned(),
            response: json!({
                "user": { "id": "n-1", "type": "clinic_user" },
                "permissions": ["appointments.view"]
            }),
        }];
        cfg
    }

    #[tokio::test]
    async fn anonymous_visit_redirects_to_login() {
        let tmp = tempfile::tempdir().unwrap();
        let report = run(
            &config(tmp.path()),
            ProbeRequest {
                location: "/documents".to_owned(),
                ..ProbeRequest::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(report.bootstrap, BootstrapPhase::Unauthenticated);
        assert_eq!(
            report.gates.auth,
            AuthGateDecision::Redirect {
                to: "/login?returnTo=%2Fdocuments".to_owned()
            }
        );
        assert_eq!(report.gates.render, GateRender::Nothing);
        assert_eq!(report.navigations.len(), 1);
        assert_eq!(report.navigations[0].kind, "replace");
    }

    #[tokio::test]
    async fn login_persists_across_runs_until_logout() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());

        let first = run(
            &cfg,
            ProbeRequest {
                location: "/login?returnTo=%2Fdocuments".to_owned(),
                required: vec!["documents.view".to_owned()],
                has_content: true,
                login: Some(SecretString::from("nurse".to_owned())),
                ..ProbeRequest::default()
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            first.login,
            Some(LoginReport::Succeeded { ref destination }) if destination == "/documents"
        ));
        assert_eq!(first.gates.location, "/documents");
        assert_eq!(first.gates.auth, AuthGateDecision::Pass);
        assert_eq!(first.gates.permission, Some(PermissionGateDecision::Denied));
        assert_eq!(first.gates.render, GateRender::Restricted);
        assert_eq!(first.session.role, CanonicalRole::Patient);

        let second = run(
            &cfg,
            ProbeRequest {
                location: "/appointments".to_owned(),
                required: vec!["appointments.view".to_owned()],
                logout: true,
                ..ProbeRequest::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(second.bootstrap, BootstrapPhase::Authenticated);
        assert_eq!(second.gates.render, GateRender::Children);
        assert_eq!(second.logout, Some(LogoutOutcome::default()));
        assert!(!second.session.authenticated);

        let third = run(&cfg, ProbeRequest::default()).await.unwrap();
        assert_eq!(third.bootstrap, BootstrapPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn rejected_login_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let report = run(
            &config(tmp.path()),
            ProbeRequest {
                location: "/login".to_owned(),
                login: Some(SecretString::from("forged".to_owned())),
                ..ProbeRequest::default()
            },
        )
        .await
        .unwrap();

        assert!(matches!(report.login, Some(LoginReport::Failed { .. })));
        assert!(!report.session.authenticated);
        assert_eq!(report.gates.auth, AuthGateDecision::Redirect { to: "/login".to_owned() });
    }
}
