//! Process-wide authentication state.
//!
//! [`AuthStore`] is the only writer. Every mutation goes through
//! [`AuthStore::dispatch`] with an [`AuthAction`], bumps the version, and is
//! published to every [`AuthReader`] as an immutable [`AuthSnapshot`].

use std::ops::Deref;
use std::sync::Arc;

use clinic_security::{CanonicalRole, PermissionSet, can_access};
use secrecy::SecretString;
use session_sdk::{ResolvedIdentity, User};
use tokio::sync::watch;

/// Authentication state.
///
/// `user` is `None` exactly when the session is unauthenticated; `role` is
/// `patient` in that case.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub role: CanonicalRole,
    pub permissions: PermissionSet,
    pub token: Option<SecretString>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Ad-hoc capability check against the granted permissions.
    #[must_use]
    pub fn can_access(&self, required: &PermissionSet) -> bool {
        can_access(required, &self.permissions)
    }

    fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Authenticated { identity, token } => {
                self.user = Some(identity.user);
                self.role = identity.role;
                self.permissions = identity.permissions;
                self.token = token;
            }
            AuthAction::Clear => *self = Self::default(),
        }
    }
}

/// State transitions.
#[derive(Debug)]
pub enum AuthAction {
    /// Replace the whole session with a resolved identity.
    Authenticated {
        identity: ResolvedIdentity,
        token: Option<SecretString>,
    },
    /// Reset to the unauthenticated default.
    Clear,
}

/// Immutable, versioned view of the state.
#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    version: u64,
    state: Arc<AuthState>,
}

impl AuthSnapshot {
    /// Number of transitions applied before this snapshot was taken.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Deref for AuthSnapshot {
    type Target = AuthState;

    fn deref(&self) -> &AuthState {
        &self.state
    }
}

/// Single writer of the authentication state.
pub struct AuthStore {
    tx: watch::Sender<AuthSnapshot>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::default());
        Self { tx }
    }

    /// Apply a transition and publish the next snapshot.
    pub fn dispatch(&self, action: AuthAction) {
        self.tx.send_modify(|snapshot| {
            let mut next = AuthState::clone(&snapshot.state);
            next.apply(action);
            snapshot.version += 1;
            snapshot.state = Arc::new(next);
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn reader(&self) -> AuthReader {
        AuthReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only handle on the authentication state.
#[derive(Debug, Clone)]
pub struct AuthReader {
    rx: watch::Receiver<AuthSnapshot>,
}

impl AuthReader {
    #[must_use]
    pub fn current(&self) -> AuthSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next transition. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<AuthSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
