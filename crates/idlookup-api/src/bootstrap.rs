//! # Service Bootstrap
//!
//! ## Bootstrap Sequence
//!
//! 1. **Secret store.** AWS Secrets Manager or environment variables,
//!    per `SECRET_STORE`.
//! 2. **Databases.** Resolve credentials and connect to both databases.
//!    Any failure aborts startup.
//! 3. **API token.** Pre-fetch the service token. Failure is logged and
//!    the gate fetches lazily instead.

use std::sync::Arc;

use idlookup_core::Database;
use idlookup_secrets::{EnvSecretStore, SecretError, SecretStore};

use crate::auth::ApiKeyGate;
use crate::config::{AppConfig, SecretBackend};
use crate::db::{ConnectError, ConnectionManager, DbConfigResolver};
use crate::state::AppContext;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("secret store: {0}")]
    Secrets(#[from] SecretError),

    #[error(transparent)]
    Connect(#[from] ConnectError),
}

/// Build the secret store selected by `config`.
pub async fn secret_store(config: &AppConfig) -> Result<Arc<dyn SecretStore>, SecretError> {
    match config.secret_backend {
        SecretBackend::Env => {
            tracing::info!("using environment secret store");
            Ok(Arc::new(EnvSecretStore::new()))
        }
        SecretBackend::Aws => aws_store(config).await,
    }
}

#[cfg(feature = "aws-secrets")]
async fn aws_store(config: &AppConfig) -> Result<Arc<dyn SecretStore>, SecretError> {
    let store = idlookup_secrets::AwsSecretsManagerStore::connect(
        config.aws_region.as_deref(),
        config.environment.uses_profile_credentials(),
    )
    .await;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "aws-secrets"))]
async fn aws_store(_config: &AppConfig) -> Result<Arc<dyn SecretStore>, SecretError> {
    Err(SecretError::Unavailable(
        "built without the aws-secrets feature; set SECRET_STORE=env".into(),
    ))
}

/// Run the bootstrap sequence against the configured secret store.
pub async fn bootstrap(config: &AppConfig) -> Result<AppContext, BootstrapError> {
    let secrets = secret_store(config).await?;
    initialize(config, secrets).await
}

/// Connect the databases and prepare the API key gate using `secrets`.
pub async fn initialize(
    config: &AppConfig,
    secrets: Arc<dyn SecretStore>,
) -> Result<AppContext, BootstrapError> {
    let resolver = DbConfigResolver::from_config(config, secrets.clone());
    let connections = ConnectionManager::connect(&resolver, &Database::ALL)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database initialization failed");
            e
        })?;

    let gate = Arc::new(ApiKeyGate::new(secrets, config.api_token_secret_name.clone()));
    gate.warm_up().await;

    tracing::info!(
        environment = ?config.environment,
        min_app_version = %config.min_app_version.as_str(),
        "bootstrap complete"
    );
    Ok(AppContext::new(
        Arc::new(connections),
        gate,
        config.min_app_version.clone(),
    ))
}
