//! Canonical role model and the normalizer for upstream identity payloads.
//!
//! Upstream identity providers disagree on where the role lives and how it is
//! spelled. [`normalize`] folds every payload into one [`CanonicalRole`] using
//! an ordered, table-driven rule set:
//!
//! 1. The first usable value among [`ROLE_FIELD_ALIASES`], otherwise the first
//!    element of [`ROLE_LIST_FIELD`].
//! 2. Strings are lower-cased and classified by [`ROLE_RULES`] (first match wins).
//! 3. Integers map through [`CanonicalRole::from_code`].
//! 4. Anything else falls back to [`CanonicalRole::Patient`].
//!
//! The function is total: there is no "unknown role" outcome, and ambiguous
//! input is never promoted above `patient`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// The closed set of roles used for every access decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    Admin,
    Doctor,
    #[default]
    Patient,
}

impl CanonicalRole {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Doctor, Self::Patient];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Patient => "patient",
        }
    }

    /// Map a numeric role code. Unknown codes are `patient`.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Admin,
            2 => Self::Doctor,
            _ => Self::Patient,
        }
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar fields probed for a role value, highest precedence first.
pub const ROLE_FIELD_ALIASES: [&str; 4] = ["role", "userType", "type", "user_type"];

/// List field whose first element is used when no scalar alias carries a value.
pub const ROLE_LIST_FIELD: &str = "roles";

/// A single string test applied to a lower-cased role value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMatch {
    Contains(&'static str),
    Equals(&'static str),
}

impl RoleMatch {
    fn matches(self, lowered: &str) -> bool {
        match self {
            Self::Contains(needle) => lowered.contains(needle),
            Self::Equals(expected) => lowered == expected,
        }
    }
}

/// String classification rules, evaluated top to bottom.
pub const ROLE_RULES: &[(CanonicalRole, &[RoleMatch])] = &[
    (
        CanonicalRole::Admin,
        &[RoleMatch::Contains("admin"), RoleMatch::Equals("administrator")],
    ),
    (
        CanonicalRole::Doctor,
        &[
            RoleMatch::Contains("doctor"),
            RoleMatch::Contains("physician"),
            RoleMatch::Equals("medical"),
        ],
    ),
    (
        CanonicalRole::Patient,
        &[
            RoleMatch::Contains("patient"),
            RoleMatch::Contains("client"),
            RoleMatch::Equals("user"),
        ],
    ),
];

/// The raw role value picked out of an identity payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoleSignal<'a> {
    Text(&'a str),
    Code(&'a Number),
}

/// Extract the role value that [`normalize`] will classify.
///
/// Returns `None` when the payload is not an object or no alias carries a
/// non-empty string or a number.
#[must_use]
pub fn role_signal(raw: &Value) -> Option<RoleSignal<'_>> {
    raw.as_object().and_then(field_role_signal)
}

/// [`role_signal`] over an already-destructured JSON object.
#[must_use]
pub fn field_role_signal(fields: &Map<String, Value>) -> Option<RoleSignal<'_>> {
    ROLE_FIELD_ALIASES
        .iter()
        .filter_map(|alias| fields.get(*alias))
        .find_map(usable_signal)
        .or_else(|| {
            fields
                .get(ROLE_LIST_FIELD)
                .and_then(Value::as_array)
                .and_then(|roles| roles.first())
                .and_then(usable_signal)
        })
}

fn usable_signal(value: &Value) -> Option<RoleSignal<'_>> {
    match value {
        Value::String(text) if !text.is_empty() => Some(RoleSignal::Text(text)),
        Value::Number(code) => Some(RoleSignal::Code(code)),
        _ => None,
    }
}

/// Classify a role string against [`ROLE_RULES`].
#[must_use]
pub fn classify_text(text: &str) -> Option<CanonicalRole> {
    let lowered = text.to_lowercase();
    ROLE_RULES
        .iter()
        .find(|(_, matchers)| matchers.iter().any(|m| m.matches(&lowered)))
        .map(|(role, _)| *role)
}

/// Normalize an arbitrary identity payload to a canonical role.
#[must_use]
pub fn normalize(raw: &Value) -> CanonicalRole {
    classify_signal(role_signal(raw))
}

/// [`normalize`] over an already-destructured JSON object.
#[must_use]
pub fn normalize_fields(fields: &Map<String, Value>) -> CanonicalRole {
    classify_signal(field_role_signal(fields))
}

fn classify_signal(signal: Option<RoleSignal<'_>>) -> CanonicalRole {
    match signal {
        Some(RoleSignal::Text(text)) => classify_text(text).unwrap_or_default(),
        Some(RoleSignal::Code(code)) => code
            .as_i64()
            .map_or(CanonicalRole::Patient, CanonicalRole::from_code),
        None => CanonicalRole::default(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalar_alias_beats_role_list() {
        let raw = json!({ "roles": ["admin"], "user_type": "doctor" });
        assert_eq!(role_signal(&raw), Some(RoleSignal::Text("doctor")));
        assert_eq!(normalize(&raw), CanonicalRole::Doctor);
    }

    #[test]
    fn alias_precedence_follows_declared_order() {
        let raw = json!({ "type": "patient", "userType": "physician", "role": "" });
        assert_eq!(normalize(&raw), CanonicalRole::Doctor);
    }

    #[test]
    fn admin_rule_is_checked_before_doctor() {
        assert_eq!(classify_text("doctor_admin"), Some(CanonicalRole::Admin));
    }

    #[test]
    fn equality_rules_do_not_match_substrings() {
        assert_eq!(classify_text("medical_staff"), None);
        assert_eq!(classify_text("superuser"), None);
        assert_eq!(classify_text("MEDICAL"), Some(CanonicalRole::Doctor));
        assert_eq!(classify_text("User"), Some(CanonicalRole::Patient));
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(normalize(&json!({ "role": 1 })), CanonicalRole::Admin);
        assert_eq!(normalize(&json!({ "userType": 2 })), CanonicalRole::Doctor);
        assert_eq!(normalize(&json!({ "type": 3 })), CanonicalRole::Patient);
        assert_eq!(normalize(&json!({ "role": 42 })), CanonicalRole::Patient);
        assert_eq!(normalize(&json!({ "role": -1 })), CanonicalRole::Patient);
        assert_eq!(normalize(&json!({ "role": 1.5 })), CanonicalRole::Patient);
    }

    #[test]
    fn role_list_with_numeric_first_entry() {
        assert_eq!(normalize(&json!({ "roles": [2, "admin"] })), CanonicalRole::Doctor);
    }

    #[test]
    fn display_matches_serde_name() {
        for role in CanonicalRole::ALL {
            let serialized = serde_json::to_value(role).unwrap();
            assert_eq!(serialized, Value::String(role.to_string()));
        }
    }
}
