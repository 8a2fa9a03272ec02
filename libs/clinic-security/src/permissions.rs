//! Permission sets and the access evaluator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Token granting every permission.
pub const UNIVERSAL_PERMISSION: &str = "*";

/// A set of opaque permission tokens (`domain.action`, role names, or `*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the universal token.
    #[must_use]
    pub fn universal() -> Self {
        Self::from([UNIVERSAL_PERMISSION])
    }

    pub fn insert(&mut self, token: impl Into<String>) -> bool {
        self.0.insert(token.into())
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.contains(UNIVERSAL_PERMISSION)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PermissionSet {
    fn from(tokens: [&str; N]) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

/// Decide whether `granted` satisfies `required`.
///
/// A universal grant always passes. Otherwise an empty requirement passes and
/// a non-empty one passes when any single required token is granted: callers
/// mix role tokens and feature tokens ("admin OR documents.view").
#[must_use]
pub fn can_access(required: &PermissionSet, granted: &PermissionSet) -> bool {
    if granted.is_universal() {
        return true;
    }
    required.is_empty() || required.iter().any(|token| granted.contains(token))
}
