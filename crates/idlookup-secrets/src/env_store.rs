//! Secrets injected through environment variables.
//!
//! A secret named `prod/mysql/eligibility` is read from
//! `IDLOOKUP_SECRET_PROD_MYSQL_ELIGIBILITY`: the name is upper-cased and
//! every character outside `[A-Z0-9]` becomes `_`. The value must be the
//! secret's JSON document.
//!
//! ```bash
//! export IDLOOKUP_SECRET_SERVICE_API_TOKEN='{"token":"..."}'
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::{parse_payload, SecretError, SecretStore};

/// Default prefix for secret environment variables.
pub const DEFAULT_PREFIX: &str = "IDLOOKUP_SECRET_";

/// Reads secrets from environment variables.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    /// Store using [`DEFAULT_PREFIX`].
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Store using a custom variable prefix.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Environment variable that holds the named secret.
    pub fn var_name(&self, secret_name: &str) -> String {
        let normalized: String = secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{normalized}", self.prefix)
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Value, SecretError> {
        let var = self.var_name(name);
        tracing::debug!(secret = %name, var = %var, "reading secret from environment");
        let raw = std::env::var(&var).map_err(|_| SecretError::Fetch {
            name: name.to_string(),
            message: format!("environment variable {var} not set"),
        })?;
        parse_payload(name, raw.as_bytes())
    }

    fn store_name(&self) -> &str {
        "EnvSecretStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_name_normalizes_secret_name() {
        let store = EnvSecretStore::new();
        assert_eq!(
            store.var_name("prod/mysql-eligibility.v2"),
            "IDLOOKUP_SECRET_PROD_MYSQL_ELIGIBILITY_V2"
        );
    }

    #[tokio::test]
    async fn reads_json_from_variable() {
        let store = EnvSecretStore::with_prefix("IDLOOKUP_TEST_ENV_STORE_");
        let var = store.var_name("svc/token");
        std::env::set_var(&var, r#"{"token":"from-env"}"#);

        let value = store.get_secret("svc/token").await.unwrap();
        assert_eq!(value["token"], "from-env");

        std::env::remove_var(&var);
    }

    #[tokio::test]
    async fn missing_variable_is_fetch_error() {
        let store = EnvSecretStore::with_prefix("IDLOOKUP_TEST_ENV_STORE_MISSING_");
        let err = store.get_secret("nothing/here").await.unwrap_err();
        assert!(matches!(err, SecretError::Fetch { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let store = EnvSecretStore::with_prefix("IDLOOKUP_TEST_ENV_STORE_BAD_");
        let var = store.var_name("db");
        std::env::set_var(&var, "username=root");

        let err = store.get_secret("db").await.unwrap_err();
        assert!(matches!(err, SecretError::Malformed { .. }));

        std::env::remove_var(&var);
    }
}
