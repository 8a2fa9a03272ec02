//! Session Module
//!
//! Recovers the persisted credential once per process, resolves it into a
//! canonical identity, and gates views on authentication and permissions.
//!
//! Entry point is [`SessionService`]; guards and the navigation filter are
//! pure functions over the snapshots it publishes.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::SessionConfig;
pub use domain::navigation::{NavItem, login_redirect, return_destination, visible_nav_items};
pub use domain::{
    AuthGate, AuthGateDecision, AuthSnapshot, AuthState, BootstrapPhase, GateRender,
    LoginOutcome, LogoutOutcome, MissingPermissionsPolicy, Notice, PermissionGate,
    PermissionGateDecision, ProtectedRoute, RouteDecision, SessionError, SessionService,
    SessionView, ShellRender,
};
pub use infra::storage::{FileTokenPersistence, MemoryTokenPersistence};
