//! # AWS Secrets Manager Store
//!
//! Resolves secrets with `GetSecretValue`. The payload is the secret's
//! `SecretString` when set, otherwise its `SecretBinary` bytes; either
//! must hold a JSON document.
//!
//! ## Credentials
//!
//! Outside development the default provider chain is used (environment,
//! web identity, ECS/EC2 instance roles). Development machines use the
//! shared profile chain, which resolves AWS SSO sessions:
//!
//! ```bash
//! aws sso login --profile dev
//! export AWS_PROFILE=dev ENV=dev
//! ```

use async_trait::async_trait;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::{BehaviorVersion, Region};
use serde_json::Value;

use crate::{parse_payload, SecretError, SecretStore};

/// AWS Secrets Manager backend.
pub struct AwsSecretsManagerStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretsManagerStore {
    /// Build a client for `region` (SDK default when `None`).
    ///
    /// `use_profile_credentials` selects the shared profile (SSO) chain
    /// instead of the default chain.
    pub async fn connect(region: Option<&str>, use_profile_credentials: bool) -> Self {
        tracing::info!(
            region = region.unwrap_or("<default>"),
            profile_credentials = use_profile_credentials,
            "initializing Secrets Manager client"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(r) = region {
            loader = loader.region(Region::new(r.to_string()));
        }
        if use_profile_credentials {
            loader = loader.credentials_provider(ProfileFileCredentialsProvider::builder().build());
        }
        let sdk_config = loader.load().await;

        tracing::info!("Secrets Manager client ready");
        Self {
            client: aws_sdk_secretsmanager::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretsManagerStore {
    async fn get_secret(&self, name: &str) -> Result<Value, SecretError> {
        tracing::debug!(secret = %name, "requesting secret from Secrets Manager");

        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(secret = %name, error = %e, "error retrieving secret");
                SecretError::Fetch {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            })?;

        let value = if let Some(text) = output.secret_string() {
            parse_payload(name, text.as_bytes())?
        } else if let Some(blob) = output.secret_binary() {
            parse_payload(name, blob.as_ref())?
        } else {
            return Err(SecretError::Empty {
                name: name.to_string(),
            });
        };

        tracing::debug!(secret = %name, "retrieved secret from Secrets Manager");
        Ok(value)
    }

    fn store_name(&self) -> &str {
        "AwsSecretsManagerStore"
    }
}
