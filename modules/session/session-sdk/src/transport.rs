//! Default headers of the shared outbound transport.

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue, InvalidHeaderValue};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

/// Mutable default headers applied to every outbound call made through the
/// shared transport.
///
/// Only the `Authorization` entry is managed by the session core; other
/// entries are left untouched.
#[derive(Debug, Default)]
pub struct TransportHeaders {
    headers: RwLock<HeaderMap>,
}

impl TransportHeaders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `Authorization: Bearer <token>` as a sensitive default header.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHeaderValue` if the token contains bytes that are not
    /// allowed in a header value. The previous header is removed in that case.
    pub fn install_bearer(&self, token: &SecretString) -> Result<(), InvalidHeaderValue> {
        let mut headers = self.headers.write();
        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
                Ok(())
            }
            Err(e) => {
                headers.remove(AUTHORIZATION);
                Err(e)
            }
        }
    }

    /// Remove the `Authorization` default header.
    pub fn remove_authorization(&self) {
        self.headers.write().remove(AUTHORIZATION);
    }

    /// The bearer token currently installed, without the `Bearer ` prefix.
    #[must_use]
    pub fn bearer_token(&self) -> Option<SecretString> {
        self.headers
            .read()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| SecretString::from(s.trim().to_owned()))
    }

    /// Copy of the current default headers, for the transport to merge into a request.
    #[must_use]
    pub fn snapshot(&self) -> HeaderMap {
        self.headers.read().clone()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn install_and_remove_bearer() {
        let headers = TransportHeaders::new();
        headers.install_bearer(&SecretString::from("abc".to_owned())).unwrap();

        let snapshot = headers.snapshot();
        let value = snapshot.get(AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
        assert!(value.is_sensitive());
        assert_eq!(
            headers.bearer_token().map(|t| t.expose_secret().to_owned()),
            Some("abc".to_owned())
        );

        headers.remove_authorization();
        assert!(headers.snapshot().get(AUTHORIZATION).is_none());
        assert!(headers.bearer_token().is_none());
    }

    #[test]
    fn invalid_token_leaves_no_header() {
        let headers = TransportHeaders::new();
        headers.install_bearer(&SecretString::from("good".to_owned())).unwrap();

        let result = headers.install_bearer(&SecretString::from("bad\ntoken".to_owned()));
        assert!(result.is_err());
        assert!(headers.bearer_token().is_none());
    }
}
