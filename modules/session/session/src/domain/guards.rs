//! Access guards.
//!
//! Each gate is a small state machine, `Checking -> {Pass, Redirect|Denied}`,
//! evaluated as a pure function of the bootstrap phase and an auth snapshot.
//! Navigation is a separate step ([`AuthGate::apply`]) so the decision itself
//! stays side-effect free.
//!
//! - The authentication gate redirects to the login route with a `returnTo`
//!   parameter when nobody is logged in.
//! - The permission gate never navigates: it renders the children, a
//!   restricted placeholder, or nothing.

use clinic_security::PermissionSet;
use serde::Serialize;
use session_sdk::Router;
use tracing::debug;

use super::bootstrap::BootstrapPhase;
use super::navigation::login_redirect;
use super::state::AuthState;
use crate::config::SessionConfig;

/// What a gate puts on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRender {
    Nothing,
    Children,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AuthGateDecision {
    Checking,
    Pass,
    Redirect { to: String },
}

impl AuthGateDecision {
    #[must_use]
    pub fn render(&self) -> GateRender {
        match self {
            Self::Pass => GateRender::Children,
            Self::Checking | Self::Redirect { .. } => GateRender::Nothing,
        }
    }
}

/// Gate requiring a logged-in user.
#[derive(Debug, Clone)]
pub struct AuthGate {
    auth_disabled: bool,
    login_route: String,
    return_to_param: String,
}

impl AuthGate {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            auth_disabled: config.auth_disabled,
            login_route: config.login_route.clone(),
            return_to_param: config.return_to_param.clone(),
        }
    }

    #[must_use]
    pub fn decide(
        &self,
        phase: BootstrapPhase,
        state: &AuthState,
        current_location: &str,
    ) -> AuthGateDecision {
        if !phase.is_settled() {
            return AuthGateDecision::Checking;
        }
        if self.auth_disabled || state.is_authenticated() {
            return AuthGateDecision::Pass;
        }
        AuthGateDecision::Redirect {
            to: login_redirect(&self.login_route, &self.return_to_param, current_location),
        }
    }

    /// Perform the navigation a decision calls for.
    pub fn apply(decision: &AuthGateDecision, router: &dyn Router) {
        if let AuthGateDecision::Redirect { to } = decision {
            debug!(to = %to, "Redirecting unauthenticated visitor to login");
            router.replace(to);
        }
    }

    /// Decide for the router's current location and apply the result.
    #[must_use]
    pub fn check(
        &self,
        phase: BootstrapPhase,
        state: &AuthState,
        router: &dyn Router,
    ) -> AuthGateDecision {
        let decision = self.decide(phase, state, &router.current_location());
        Self::apply(&decision, router);
        decision
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionGateDecision {
    Checking,
    Pass,
    Denied,
}

/// Gate requiring any of a set of permissions.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    required: PermissionSet,
    has_content: bool,
}

impl PermissionGate {
    /// `has_content` selects a restricted placeholder over rendering nothing
    /// on denial.
    #[must_use]
    pub fn new(required: PermissionSet, has_content: bool) -> Self {
        Self {
            required,
            has_content,
        }
    }

    #[must_use]
    pub fn required(&self) -> &PermissionSet {
        &self.required
    }

    #[must_use]
    pub fn decide(&self, phase: BootstrapPhase, state: &AuthState) -> PermissionGateDecision {
        if !phase.is_settled() {
            PermissionGateDecision::Checking
        } else if state.can_access(&self.required) {
            PermissionGateDecision::Pass
        } else {
            PermissionGateDecision::Denied
        }
    }

    #[must_use]
    pub fn render(&self, decision: PermissionGateDecision) -> GateRender {
        match decision {
            PermissionGateDecision::Pass => GateRender::Children,
            PermissionGateDecision::Denied if self.has_content => GateRender::Restricted,
            PermissionGateDecision::Checking | PermissionGateDecision::Denied => {
                GateRender::Nothing
            }
        }
    }
}

/// A protected view: authentication first, then an optional permission gate.
#[derive(Debug, Clone)]
pub struct ProtectedRoute {
    auth: AuthGate,
    permission: Option<PermissionGate>,
}

impl ProtectedRoute {
    #[must_use]
    pub fn new(auth: AuthGate) -> Self {
        Self {
            auth,
            permission: None,
        }
    }

    #[must_use]
    pub fn requiring(mut self, permission: PermissionGate) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Run both gates for the router's current location, applying any
    /// redirect, and report each decision with the combined render.
    #[must_use]
    pub fn evaluate(
        &self,
        phase: BootstrapPhase,
        state: &AuthState,
        router: &dyn Router,
    ) -> RouteDecision {
        let auth = self.auth.check(phase, state, router);
        let permission = self
            .permission
            .as_ref()
            .map(|gate| (gate, gate.decide(phase, state)));

        let render = match (&auth, permission) {
            (AuthGateDecision::Pass, Some((gate, decision))) => gate.render(decision),
            (AuthGateDecision::Pass, None) => GateRender::Children,
            (other, _) => other.render(),
        };

        RouteDecision {
            auth,
            permission: permission.map(|(_, decision)| decision),
            render,
        }
    }

    #[must_use]
    pub fn check(
        &self,
        phase: BootstrapPhase,
        state: &AuthState,
        router: &dyn Router,
    ) -> GateRender {
        self.evaluate(phase, state, router).render
    }
}

/// Outcome of [`ProtectedRoute::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDecision {
    pub auth: AuthGateDecision,
    /// `None` when the route requires no permissions gate.
    pub permission: Option<PermissionGateDecision>,
    pub render: GateRender,
}
