//! Identity resolution: one round trip to the identity backend, reconciled
//! into a canonical `{ user, role, permissions }` triple.

use std::sync::Arc;
use std::time::Duration;

use clinic_security::{PermissionSet, normalize_fields};
use serde::Deserialize;
use serde_json::Value;
use session_sdk::{IdentityFetchClient, ResolvedIdentity, User};
use tracing::debug;

use super::error::DomainError;

/// What to grant when an identity arrives without a usable permission list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPermissionsPolicy {
    /// Authenticated implies full access unless explicitly restricted.
    #[default]
    GrantUniversal,
    /// Grant nothing.
    DenyAll,
}

impl MissingPermissionsPolicy {
    #[must_use]
    pub fn fallback(self) -> PermissionSet {
        match self {
            Self::GrantUniversal => PermissionSet::universal(),
            Self::DenyAll => PermissionSet::new(),
        }
    }
}

/// Identity resolver service.
pub struct IdentityResolver {
    fetch: Arc<dyn IdentityFetchClient>,
    policy: MissingPermissionsPolicy,
    timeout: Option<Duration>,
}

impl IdentityResolver {
    #[must_use]
    pub fn new(fetch: Arc<dyn IdentityFetchClient>, policy: MissingPermissionsPolicy) -> Self {
        Self {
            fetch,
            policy,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch and interpret the identity behind the current credential.
    ///
    /// # Errors
    ///
    /// - `Fetch` if the backend call fails
    /// - `Timeout` if the configured bound expires
    /// - `Application` if the body carries an application-level error
    /// - `MalformedResponse` if no user object can be extracted
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self) -> Result<ResolvedIdentity, DomainError> {
        let body = self.fetch_body().await?;
        let identity = interpret_body(body, self.policy)?;
        debug!(
            role = %identity.role,
            permission_count = identity.permissions.len(),
            "Identity resolved"
        );
        Ok(identity)
    }

    async fn fetch_body(&self) -> Result<Value, DomainError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetch.fetch_identity())
                .await
                .map_err(|_| DomainError::Timeout(limit))?
                .map_err(DomainError::from),
            None => self.fetch.fetch_identity().await.map_err(DomainError::from),
        }
    }
}

/// Interpret a raw identity body.
///
/// Accepts the user object itself, `{ user, permissions }`, or either wrapped
/// in `{ data: ... }`.
///
/// # Errors
///
/// - `Application` if the body carries `success: false` or a truthy `error`
/// - `MalformedResponse` if the payload or its `user` is not a non-empty object
pub fn interpret_body(
    body: Value,
    policy: MissingPermissionsPolicy,
) -> Result<ResolvedIdentity, DomainError> {
    if let Some(reason) = application_error(&body) {
        return Err(DomainError::Application(reason));
    }

    let Value::Object(mut payload) = unwrap_data(body) else {
        return Err(DomainError::malformed("identity payload is not an object"));
    };

    let (user, listed) = match payload.remove("user") {
        Some(Value::Object(user)) => {
            let listed = permission_tokens(payload.get("permissions"))
                .or_else(|| permission_tokens(user.get("permissions")));
            (user, listed)
        }
        None => {
            let listed = permission_tokens(payload.get("permissions"));
            (payload, listed)
        }
        Some(_) => return Err(DomainError::malformed("user field is not an object")),
    };

    if user.is_empty() {
        return Err(DomainError::malformed("user object is empty"));
    }

    let permissions = listed.unwrap_or_else(|| policy.fallback());
    let role = normalize_fields(&user);

    Ok(ResolvedIdentity {
        user: User::new(user),
        role,
        permissions,
    })
}

fn application_error(body: &Value) -> Option<String> {
    let fields = body.as_object()?;

    if let Some(error) = fields.get("error").filter(|v| is_truthy(v)) {
        return Some(match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        });
    }

    if fields.get("success").and_then(Value::as_bool) == Some(false) {
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("identity request was not successful");
        return Some(message.to_owned());
    }

    None
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(data @ Value::Object(_)) => data,
            Some(other) => {
                fields.insert("data".to_owned(), other);
                Value::Object(fields)
            }
            None => Value::Object(fields),
        },
        other => other,
    }
}

/// String entries of a permission list; `None` when absent or empty.
fn permission_tokens(value: Option<&Value>) -> Option<PermissionSet> {
    let tokens: PermissionSet = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .filter(|token| !token.is_empty())
        .collect();
    (!tokens.is_empty()).then_some(tokens)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use clinic_security::CanonicalRole;
    use serde_json::json;

    use super::*;

    fn interpret(body: Value) -> Result<ResolvedIdentity, DomainError> {
        interpret_body(body, MissingPermissionsPolicy::GrantUniversal)
    }

    #[test]
    fn direct_user_payload() {
        let identity = interpret(json!({ "id": 1, "name": "Ada", "role": "doctor" })).unwrap();
        assert_eq!(identity.role, CanonicalRole::Doctor);
        assert_eq!(identity.user.display_name(), Some("Ada"));
        assert_eq!(identity.permissions, PermissionSet::universal());
    }

    #[test]
    fn nested_data_and_user_with_permissions() {
        let identity = interpret(json!({
            "data": {
                "user": { "id": "u1", "userType": "ADMIN" },
                "permissions": ["records.view", "records.edit", 7, ""]
            }
        }))
        .unwrap();

        assert_eq!(identity.role, CanonicalRole::Admin);
        assert_eq!(identity.user.id().as_deref(), Some("u1"));
        assert_eq!(
            identity.permissions,
            PermissionSet::from(["records.view", "records.edit"])
        );
    }

    #[test]
    fn permissions_on_user_object_are_used_as_fallback() {
        let identity = interpret(json!({
            "user": { "id": "u1", "permissions": ["documents.view"] }
        }))
        .unwrap();
        assert_eq!(identity.permissions, PermissionSet::from(["documents.view"]));
    }

    #[test]
    fn empty_permission_list_follows_policy() {
        let body = json!({ "user": { "id": "u1" }, "permissions": [] });

        let granted = interpret_body(body.clone(), MissingPermissionsPolicy::GrantUniversal).unwrap();
        assert_eq!(granted.permissions, PermissionSet::universal());

        let denied = interpret_body(body, MissingPermissionsPolicy::DenyAll).unwrap();
        assert!(denied.permissions.is_empty());
    }

    #[test]
    fn application_error_flags_fail_resolution() {
        for body in [
            json!({ "success": false, "message": "account locked" }),
            json!({ "error": "token expired", "data": { "user": { "id": 1 } } }),
            json!({ "error": { "code": 401 } }),
        ] {
            assert!(matches!(interpret(body), Err(DomainError::Application(_))));
        }
    }

    #[test]
    fn falsy_error_field_is_not_a_failure() {
        for error in [json!(null), json!(false), json!("")] {
            let body = json!({ "error": error.clone(), "success": true, "user": { "id": 1 } });
            let identity = interpret(body);
            assert!(identity.is_ok(), "error field {error} should not fail resolution");
        }
    }

    #[test]
    fn malformed_payloads() {
        for body in [
            json!("ok"),
            json!([]),
            json!({}),
            json!({ "data": {} }),
            json!({ "user": "u1" }),
            json!({ "user": null }),
            json!({ "user": {} }),
        ] {
            assert!(
                matches!(interpret(body.clone()), Err(DomainError::MalformedResponse(_))),
                "expected malformed for {body}"
            );
        }
    }

    #[test]
    fn non_object_data_is_left_in_place() {
        let identity = interpret(json!({ "id": 3, "data": "opaque" })).unwrap();
        assert_eq!(identity.user.get("data"), Some(&json!("opaque")));
    }
}
