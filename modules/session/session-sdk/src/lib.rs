//! Session SDK
//!
//! This crate provides the public contracts of the `session` module:
//!
//! - [`IdentityResolverClient`] - Public API trait for identity resolution
//! - [`IdentityFetchClient`] - Remote identity fetch implemented by backends/plugins
//! - [`TokenPersistence`] - Persisted key-value storage for the credential
//! - [`TransportHeaders`] - Default headers of the shared outbound transport
//! - [`Router`] - Routing collaborator used by guards and the login flow
//! - [`ResolvedIdentity`], [`User`] - Models
//! - [`IdentityFetchError`], [`IdentityResolverError`], [`StorageError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use session_sdk::IdentityResolverClient;
//!
//! let identity = resolver.resolve().await?;
//! println!("{} ({})", identity.user.display_name().unwrap_or("?"), identity.role);
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;
pub mod routing;
pub mod transport;

// Re-export main types at crate root
pub use api::IdentityResolverClient;
pub use error::{IdentityFetchError, IdentityResolverError, StorageError};
pub use models::{ResolvedIdentity, User};
pub use plugin_api::{IdentityFetchClient, TokenPersistence};
pub use routing::Router;
pub use transport::TransportHeaders;
