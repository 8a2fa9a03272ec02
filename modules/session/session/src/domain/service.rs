use std::sync::Arc;

use clinic_security::PermissionSet;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use session_sdk::{
    IdentityFetchClient, IdentityResolverClient, IdentityResolverError, ResolvedIdentity, Router,
    TokenPersistence, TransportHeaders, User,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::bootstrap::{BootstrapPhase, BootstrapSequencer};
use super::error::SessionError;
use super::guards::AuthGate;
use super::local_client::IdentityResolverLocalClient;
use super::navigation::return_destination;
use super::resolver::IdentityResolver;
use super::state::{AuthAction, AuthReader, AuthSnapshot, AuthStore};
use super::token_store::TokenStore;
use crate::config::SessionConfig;

// ============================================================================
// Outcomes
// ============================================================================

/// Transient message for the user. Never changes session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    RemoteLogoutFailed { reason: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteLogoutFailed { reason } => {
                write!(f, "signed out locally, remote logout failed: {reason}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    /// Where the caller was sent after login.
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub notice: Option<Notice>,
}

/// What the application shell renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellRender {
    LoadingPlaceholder,
    Application,
}

impl From<BootstrapPhase> for ShellRender {
    fn from(phase: BootstrapPhase) -> Self {
        if phase.is_settled() {
            Self::Application
        } else {
            Self::LoadingPlaceholder
        }
    }
}

/// Read-only handle for views: the auth state plus the bootstrap phase.
#[derive(Debug, Clone)]
pub struct SessionView {
    auth: AuthReader,
    phase: watch::Receiver<BootstrapPhase>,
}

impl SessionView {
    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        *self.phase.borrow()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.auth.current()
    }

    #[must_use]
    pub fn shell(&self) -> ShellRender {
        self.phase().into()
    }

    /// Wait until the bootstrap phase leaves `Loading`.
    pub async fn settled(&mut self) -> BootstrapPhase {
        let settled = self
            .phase
            .wait_for(|phase| phase.is_settled())
            .await
            .map(|phase| *phase);
        settled.unwrap_or_else(|_| self.phase())
    }

    /// Wait for the next auth state transition.
    pub async fn changed(&mut self) -> Option<AuthSnapshot> {
        self.auth.changed().await
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Session bootstrap, explicit login/logout, and access gating.
pub struct SessionService {
    config: SessionConfig,
    tokens: TokenStore,
    resolver: Arc<dyn IdentityResolverClient>,
    fetch: Arc<dyn IdentityFetchClient>,
    state: AuthStore,
    sequencer: BootstrapSequencer,
}

impl SessionService {
    #[must_use]
    pub fn new(
        config: SessionConfig,
        persistence: Arc<dyn TokenPersistence>,
        transport: Arc<TransportHeaders>,
        fetch: Arc<dyn IdentityFetchClient>,
    ) -> Self {
        let resolver = IdentityResolver::new(Arc::clone(&fetch), config.missing_permissions)
            .with_timeout(config.identity_fetch_timeout);
        let resolver: Arc<dyn IdentityResolverClient> =
            Arc::new(IdentityResolverLocalClient::new(Arc::new(resolver)));
        let tokens = TokenStore::new(persistence, transport, config.token_key.clone());

        Self {
            config,
            tokens,
            resolver,
            fetch,
            state: AuthStore::new(),
            sequencer: BootstrapSequencer::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Recover the session once per process.
    ///
    /// Later calls return the first outcome without touching storage or the
    /// network.
    #[tracing::instrument(skip_all)]
    pub async fn bootstrap(&self) -> BootstrapPhase {
        self.sequencer.run(|| self.establish()).await
    }

    async fn establish(&self) -> BootstrapPhase {
        if self.config.auth_disabled {
            info!(role = %self.config.auth_disabled_role, "Authentication disabled, using placeholder identity");
            self.state.dispatch(AuthAction::Authenticated {
                identity: ResolvedIdentity {
                    user: User::placeholder(),
                    role: self.config.auth_disabled_role,
                    permissions: PermissionSet::universal(),
                },
                token: None,
            });
            return BootstrapPhase::Authenticated;
        }

        let Some(token) = self.tokens.get() else {
            debug!("No persisted credential");
            self.state.dispatch(AuthAction::Clear);
            return BootstrapPhase::Unauthenticated;
        };

        self.tokens.set(&token);
        if self.authenticate(token).await.is_ok() {
            BootstrapPhase::Authenticated
        } else {
            BootstrapPhase::Unauthenticated
        }
    }

    /// Resolve the identity behind `token` and publish it, or clear
    /// everything on failure.
    async fn authenticate(&self, token: SecretString) -> Result<(), IdentityResolverError> {
        match self.resolver.resolve().await {
            Ok(identity) => {
                info!(role = %identity.role, "Session established");
                self.state.dispatch(AuthAction::Authenticated {
                    identity,
                    token: Some(token),
                });
                Ok(())
            }
            Err(e) => {
                self.tokens.clear();
                self.state.dispatch(AuthAction::Clear);
                Err(e)
            }
        }
    }

    /// Wait until the bootstrap has settled.
    pub async fn settled(&self) -> BootstrapPhase {
        self.sequencer.settled().await
    }

    /// Log in with a freshly issued credential and navigate to the
    /// post-login destination.
    ///
    /// # Errors
    ///
    /// - `EmptyCredential` if `credential` is empty; nothing changes
    /// - `Rejected` if the identity cannot be resolved; the session is cleared
    #[tracing::instrument(skip_all)]
    pub async fn login(
        &self,
        credential: SecretString,
        router: &dyn Router,
    ) -> Result<LoginOutcome, SessionError> {
        if credential.expose_secret().is_empty() {
            return Err(SessionError::EmptyCredential);
        }

        self.tokens.set(&credential);
        if let Err(e) = self.authenticate(credential).await {
            self.sequencer.settle(BootstrapPhase::Unauthenticated);
            return Err(e.into());
        }
        self.sequencer.settle(BootstrapPhase::Authenticated);

        let destination = return_destination(
            &router.current_location(),
            &self.config.return_to_param,
            &self.config.home_route,
        );
        router.navigate(&destination);
        Ok(LoginOutcome { destination })
    }

    /// Clear the local session, then tell the backend.
    ///
    /// The local reset happens first and is never undone. A failed remote
    /// call only produces a notice.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self) -> LogoutOutcome {
        self.tokens.clear();
        self.state.dispatch(AuthAction::Clear);
        self.sequencer.settle(BootstrapPhase::Unauthenticated);
        info!("Session cleared");

        match self.fetch.logout().await {
            Ok(()) => LogoutOutcome::default(),
            Err(e) => {
                warn!(error = %e, "Remote logout failed, local session stays cleared");
                LogoutOutcome {
                    notice: Some(Notice::RemoteLogoutFailed {
                        reason: e.to_string(),
                    }),
                }
            }
        }
    }

    #[must_use]
    pub fn phase(&self) -> BootstrapPhase {
        self.sequencer.phase()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.snapshot()
    }

    #[must_use]
    pub fn reader(&self) -> AuthReader {
        self.state.reader()
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            auth: self.state.reader(),
            phase: self.sequencer.subscribe(),
        }
    }

    #[must_use]
    pub fn shell(&self) -> ShellRender {
        self.phase().into()
    }

    #[must_use]
    pub fn can_access(&self, required: &PermissionSet) -> bool {
        self.state.snapshot().can_access(required)
    }

    #[must_use]
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(&self.config)
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<TransportHeaders> {
        self.tokens.transport()
    }
}
