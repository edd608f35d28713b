//! Typed secret documents and the redacting [`SecretString`] wrapper.

use std::fmt;

use serde::Deserialize;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A secret string value.
///
/// `Debug` prints `[REDACTED]`. The buffer is zeroized on drop.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Constant-time comparison against caller-supplied bytes.
    ///
    /// A length mismatch still performs a dummy comparison so timing does
    /// not reveal how much of the value matched.
    pub fn matches(&self, provided: &[u8]) -> bool {
        let expected = self.0.as_bytes();
        if provided.len() != expected.len() {
            let _ = expected.ct_eq(expected);
            return false;
        }
        provided.ct_eq(expected).into()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.0.as_bytes())
    }
}

impl Eq for SecretString {}

/// Database login stored in the secret manager.
///
/// Both fields are optional at decode time so an incomplete secret can be
/// reported by name instead of surfacing as a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbCredentialSecret {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl DbCredentialSecret {
    /// Username, when present and non-empty.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Password, when present and non-empty.
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref().filter(|p| !p.is_blank())
    }
}

/// Shared API token that callers present in `x-api-key`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceTokenSecret {
    pub token: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_value() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn matches_is_exact() {
        let secret = SecretString::new("token-123");
        assert!(secret.matches(b"token-123"));
        assert!(!secret.matches(b"token-124"));
        assert!(!secret.matches(b"token-1234"));
        assert!(!secret.matches(b"Token-123"));
        assert!(!secret.matches(b""));
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds: DbCredentialSecret =
            serde_json::from_str(r#"{"username":"svc_reader","password":"s3cret"}"#).unwrap();
        let printed = format!("{creds:?}");
        assert!(printed.contains("svc_reader"));
        assert!(!printed.contains("s3cret"));
    }

    #[test]
    fn blank_credentials_are_treated_as_missing() {
        let creds: DbCredentialSecret =
            serde_json::from_str(r#"{"username":"  ","password":""}"#).unwrap();
        assert!(creds.username().is_none());
        assert!(creds.password().is_none());
    }

    #[test]
    fn missing_fields_decode_to_none() {
        let creds: DbCredentialSecret = serde_json::from_str(r#"{"username":"u"}"#).unwrap();
        assert_eq!(creds.username(), Some("u"));
        assert!(creds.password().is_none());
    }

    #[test]
    fn token_secret_requires_token() {
        assert!(serde_json::from_str::<ServiceTokenSecret>(r#"{"other":1}"#).is_err());
        let secret: ServiceTokenSecret = serde_json::from_str(r#"{"token":"t-1"}"#).unwrap();
        assert_eq!(secret.token, SecretString::new("t-1"));
    }
}
