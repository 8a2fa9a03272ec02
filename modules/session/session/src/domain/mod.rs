//! Domain layer for the session module.

pub mod bootstrap;
pub mod error;
pub mod guards;
pub mod local_client;
pub mod navigation;
pub mod resolver;
pub mod service;
pub mod state;
pub mod token_store;


pub use bootstrap::{BootstrapPhase, BootstrapSequencer};
pub use error::{DomainError, SessionError};
pub use guards::{
    AuthGate, AuthGateDecision, GateRender, PermissionGate, PermissionGateDecision, ProtectedRoute,
    RouteDecision,
};
pub use local_client::IdentityResolverLocalClient;
pub use resolver::{IdentityResolver, MissingPermissionsPolicy};
pub use service::{LoginOutcome, LogoutOutcome, Notice, SessionService, SessionView, ShellRender};
pub use state::{AuthAction, AuthReader, AuthSnapshot, AuthState, AuthStore};
pub use token_store::TokenStore;
