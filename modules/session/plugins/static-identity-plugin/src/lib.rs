#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Identity Plugin
//!
//! An `IdentityFetchClient` for environments without a live identity backend.
//! The bearer token is read from the shared transport headers and answered
//! from configuration.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): any non-empty token receives `default_identity`.
//! - **`static_tokens`**: each configured token receives its own body. Unknown
//!   tokens receive `{ "success": false, "error": "invalid token" }`.
//!
//! ## Configuration
//!
//! ```yaml
//! static_identity_plugin:
//!   mode: static_tokens
//!   tokens:
//!     - token: "doctor-token"
//!       response:
//!         data:
//!           user: { id: "d-1", name: "Dr. Grey", userType: "doctor" }
//!           permissions: ["appointments.view", "records.view"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use config::StaticIdentityPluginConfig;
pub use module::StaticIdentityPlugin;
