//! Login redirect targets and permission-filtered navigation.

use clinic_security::PermissionSet;
use url::form_urlencoded;

use super::state::AuthState;

/// Build the login redirect for an unauthenticated visit to `current_location`.
///
/// Visiting the login route itself yields the bare login route so the
/// redirect cannot nest.
#[must_use]
pub fn login_redirect(login_route: &str, return_to_param: &str, current_location: &str) -> String {
    if path_of(current_location) == path_of(login_route) {
        return login_route.to_owned();
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(return_to_param, current_location)
        .finish();
    let separator = if login_route.contains('?') { '&' } else { '?' };
    format!("{login_route}{separator}{query}")
}

/// Destination after a successful login.
///
/// Reads `return_to_param` from `current_location`'s query. Only same-origin
/// absolute paths are honoured; anything else yields `home_route`.
#[must_use]
pub fn return_destination(current_location: &str, return_to_param: &str, home_route: &str) -> String {
    current_location
        .split_once('?')
        .and_then(|(_, query)| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == return_to_param)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| is_local_path(target))
        .unwrap_or_else(|| home_route.to_owned())
}

// Browsers drop tab and newline from URLs, so "/\t/host" would become "//host".
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(|c| c.is_ascii_control())
}

fn path_of(location: &str) -> &str {
    location
        .split(['?', '#'])
        .next()
        .unwrap_or(location)
}

/// A navigation entry shown only to callers holding any of `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub route: String,
    pub required: PermissionSet,
}

impl NavItem {
    #[must_use]
    pub fn new(label: impl Into<String>, route: impl Into<String>, required: PermissionSet) -> Self {
        Self {
            label: label.into(),
            route: route.into(),
            required,
        }
    }
}

/// Items of `items` visible under `state`'s permissions, in order.
#[must_use]
pub fn visible_nav_items<'a>(items: &'a [NavItem], state: &AuthState) -> Vec<&'a NavItem> {
    items
        .iter()
        .filter(|item| state.can_access(&item.required))
        .collect()
}
