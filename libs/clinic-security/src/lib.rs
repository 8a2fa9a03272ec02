#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Canonical roles with their payload normalizer, plus the permission
//! evaluator. Pure and synchronous.

pub mod permissions;
pub mod role;

pub use permissions::{PermissionSet, UNIVERSAL_PERMISSION, can_access};
pub use role::{
    CanonicalRole, ROLE_FIELD_ALIASES, ROLE_LIST_FIELD, ROLE_RULES, normalize, normalize_fields,
};
