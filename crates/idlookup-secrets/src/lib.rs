//! # idlookup-secrets: Secret Store Abstraction
//!
//! Database credentials and the service API token live in an external
//! secret store. This crate hides the backend behind [`SecretStore`]:
//!
//! - [`StaticSecretStore`]: in-memory secrets for development and testing.
//! - [`EnvSecretStore`]: secrets injected as JSON environment variables.
//!   Suitable for container deployments without a secret manager.
//! - [`AwsSecretsManagerStore`]: AWS Secrets Manager. Requires the
//!   `aws-secrets` feature.
//!
//! Every secret is a JSON document. Typed views ([`DbCredentialSecret`],
//! [`ServiceTokenSecret`]) are decoded with [`fetch_typed`].
//!
//! ## Security Invariants
//!
//! - Secret values are wrapped in [`SecretString`], which redacts `Debug`
//!   output and zeroizes on drop.
//! - Stores never log secret values, only secret names.

pub mod env_store;
pub mod error;
pub mod static_store;
pub mod types;

#[cfg(feature = "aws-secrets")]
mod aws;

#[cfg(feature = "aws-secrets")]
pub use aws::AwsSecretsManagerStore;

pub use env_store::EnvSecretStore;
pub use error::SecretError;
pub use static_store::StaticSecretStore;
pub use types::{DbCredentialSecret, SecretString, ServiceTokenSecret};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A backend that resolves secret names to JSON documents.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// by the connection bootstrap and the API key gate.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch and decode the named secret.
    async fn get_secret(&self, name: &str) -> Result<Value, SecretError>;

    /// Human-readable backend name (for diagnostics/logging).
    fn store_name(&self) -> &str;
}

/// Whether a decoded secret carries no data at all.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Fetch a secret and decode it into `T`.
///
/// Blank secrets fail with [`SecretError::Empty`] before decoding.
pub async fn fetch_typed<T: DeserializeOwned>(
    store: &dyn SecretStore,
    name: &str,
) -> Result<T, SecretError> {
    let value = store.get_secret(name).await?;
    if is_blank(&value) {
        return Err(SecretError::Empty {
            name: name.to_string(),
        });
    }
    serde_json::from_value(value).map_err(|e| SecretError::Malformed {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Parse the raw payload of a secret into JSON.
pub(crate) fn parse_payload(name: &str, payload: &[u8]) -> Result<Value, SecretError> {
    serde_json::from_slice(payload).map_err(|e| SecretError::Malformed {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_values() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!("  ")));
        assert!(!is_blank(&json!({"token": "t"})));
        assert!(!is_blank(&json!(0)));
    }

    #[tokio::test]
    async fn fetch_typed_decodes_token() {
        let store = StaticSecretStore::new().with_secret("svc/token", json!({"token": "abc"}));
        let secret: ServiceTokenSecret = fetch_typed(&store, "svc/token").await.unwrap();
        assert_eq!(secret.token.expose(), "abc");
    }

    #[tokio::test]
    async fn fetch_typed_rejects_blank_secret() {
        let store = StaticSecretStore::new().with_secret("svc/token", json!({}));
        let err = fetch_typed::<ServiceTokenSecret>(&store, "svc/token")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::Empty { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn fetch_typed_reports_shape_mismatch() {
        let store = StaticSecretStore::new().with_secret("svc/token", json!({"token": 17}));
        let err = fetch_typed::<ServiceTokenSecret>(&store, "svc/token")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::Malformed { .. }), "got {err:?}");
    }

    #[test]
    fn parse_payload_accepts_utf8_json() {
        let value = parse_payload("db", br#"{"username":"u","password":"p"}"#).unwrap();
        assert_eq!(value["username"], "u");
        assert!(parse_payload("db", b"not json").is_err());
    }

    #[test]
    fn store_is_object_safe() {
        let _boxed: Box<dyn SecretStore> = Box::new(StaticSecretStore::new());
    }
}
