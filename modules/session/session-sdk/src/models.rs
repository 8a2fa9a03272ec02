//! Domain models shared by the session module and its collaborators.

use clinic_security::{CanonicalRole, PermissionSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user object returned by the identity backend.
///
/// The shape is owned upstream, so attributes are kept as an open JSON map.
/// The placeholder user used when authentication is disabled is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct User {
    attributes: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Empty user standing in for a real identity.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The user id as a string, accepting `id`, `_id` or `userId`.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        ["id", "_id", "userId"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// A human-readable name, accepting `name`, `fullName` or `email`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        ["name", "fullName", "email"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(Value::as_str)
    }
}

/// Result of a successful identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub user: User,
    pub role: CanonicalRole,
    pub permissions: PermissionSet,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    fn user(value: Value) -> User {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn id_accepts_numeric_and_alias_fields() {
        assert_eq!(user(json!({ "id": 17 })).id().as_deref(), Some("17"));
        assert_eq!(user(json!({ "_id": "u-1" })).id().as_deref(), Some("u-1"));
        assert_eq!(user(json!({ "id": "", "userId": "u-2" })).id().as_deref(), Some("u-2"));
        assert_eq!(User::placeholder().id(), None);
    }

    #[test]
    fn display_name_prefers_name() {
        let u = user(json!({ "email": "a@clinic.test", "name": "Ada" }));
        assert_eq!(u.display_name(), Some("Ada"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(serde_json::from_value::<User>(json!(["not", "a", "user"])).is_err());
    }
}
