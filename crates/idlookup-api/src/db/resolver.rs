//! # Connection Parameter Resolution
//!
//! Combines the host and schema declared in the environment with the login
//! held in the secret store. Credentials are fetched each time a connection
//! is set up and never cached.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use idlookup_core::Database;
use idlookup_secrets::{fetch_typed, DbCredentialSecret, SecretStore, SecretString};

use crate::config::{AppConfig, ConfigError, DatabaseSettings};

/// Everything needed to open a connection to one database.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    pub port: u16,
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

/// Resolves [`ConnectionDescriptor`]s through a [`SecretStore`].
pub struct DbConfigResolver {
    settings: HashMap<Database, DatabaseSettings>,
    port: u16,
    secrets: Arc<dyn SecretStore>,
}

impl DbConfigResolver {
    pub fn new(
        settings: HashMap<Database, DatabaseSettings>,
        port: u16,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            settings,
            port,
            secrets,
        }
    }

    /// Resolver over the databases declared in `config`.
    pub fn from_config(config: &AppConfig, secrets: Arc<dyn SecretStore>) -> Self {
        Self::new(config.databases.clone(), config.db_port, secrets)
    }

    /// Build the connection descriptor for `database`.
    pub async fn resolve(&self, database: Database) -> Result<ConnectionDescriptor, ConfigError> {
        let Some(settings) = self.settings.get(&database) else {
            tracing::warn!(%database, "no settings configured for database");
            return Err(ConfigError::UnknownDatabase(database));
        };

        tracing::debug!(
            %database,
            secret = %settings.secret_name,
            store = self.secrets.store_name(),
            "retrieving database credentials"
        );

        let creds: DbCredentialSecret = fetch_typed(self.secrets.as_ref(), &settings.secret_name)
            .await
            .map_err(|source| {
                tracing::warn!(%database, error = %source, "could not retrieve database credentials");
                ConfigError::Secret { database, source }
            })?;

        let user = creds.username().ok_or_else(|| missing(database, settings, "username"))?;
        let password = creds.password().ok_or_else(|| missing(database, settings, "password"))?;

        Ok(ConnectionDescriptor {
            host: settings.host.clone(),
            user: user.to_string(),
            password: password.clone(),
            database: settings.name.clone(),
            port: self.port,
        })
    }
}

fn missing(database: Database, settings: &DatabaseSettings, field: &'static str) -> ConfigError {
    tracing::warn!(
        %database,
        secret = %settings.secret_name,
        field,
        "database credentials are incomplete"
    );
    ConfigError::IncompleteCredentials { database, field }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlookup_secrets::{SecretError, StaticSecretStore};
    use serde_json::json;

    fn settings() -> HashMap<Database, DatabaseSettings> {
        HashMap::from([(
            Database::Eligibility,
            DatabaseSettings {
                host: "elig.db.internal".into(),
                name: "eligibility".into(),
                secret_name: "mysql/eligibility".into(),
            },
        )])
    }

    fn resolver(store: StaticSecretStore) -> DbConfigResolver {
        DbConfigResolver::new(settings(), 3306, Arc::new(store))
    }

    #[tokio::test]
    async fn resolves_complete_descriptor() {
        let store = StaticSecretStore::new().with_secret(
            "mysql/eligibility",
            json!({"username": "svc_reader", "password": "s3cret"}),
        );
        let descriptor = resolver(store).resolve(Database::Eligibility).await.unwrap();
        assert_eq!(descriptor.host, "elig.db.internal");
        assert_eq!(descriptor.user, "svc_reader");
        assert_eq!(descriptor.password.expose(), "s3cret");
        assert_eq!(descriptor.database, "eligibility");
        assert_eq!(descriptor.port, 3306);
    }

    #[tokio::test]
    async fn unconfigured_database_is_rejected_before_fetch() {
        let store = Arc::new(StaticSecretStore::new());
        let resolver = DbConfigResolver::new(settings(), 3306, store.clone());
        let err = resolver.resolve(Database::Medical).await.unwrap_err();
        assert_eq!(err, ConfigError::UnknownDatabase(Database::Medical));
        assert_eq!(store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn missing_password_is_incomplete() {
        let store = StaticSecretStore::new()
            .with_secret("mysql/eligibility", json!({"username": "svc_reader"}));
        let err = resolver(store).resolve(Database::Eligibility).await.unwrap_err();
        assert_eq!(
            err,
            ConfigError::IncompleteCredentials {
                database: Database::Eligibility,
                field: "password"
            }
        );
    }

    #[tokio::test]
    async fn missing_username_is_incomplete() {
        let store = StaticSecretStore::new()
            .with_secret("mysql/eligibility", json!({"password": "s3cret"}));
        let err = resolver(store).resolve(Database::Eligibility).await.unwrap_err();
        assert!(
            matches!(err, ConfigError::IncompleteCredentials { field: "username", .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn empty_secret_is_a_secret_error() {
        let store = StaticSecretStore::new().with_secret("mysql/eligibility", json!({}));
        let err = resolver(store).resolve(Database::Eligibility).await.unwrap_err();
        assert!(
            matches!(err, ConfigError::Secret { source: SecretError::Empty { .. }, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn store_failure_is_wrapped() {
        let store = StaticSecretStore::new().with_failure("mysql/eligibility", "AccessDenied");
        let err = resolver(store).resolve(Database::Eligibility).await.unwrap_err();
        assert!(err.to_string().contains("eligibility"));
        assert!(err.to_string().contains("AccessDenied"));
    }

    #[test]
    fn debug_redacts_password() {
        let descriptor = ConnectionDescriptor {
            host: "h".into(),
            user: "u".into(),
            password: SecretString::new("s3cret"),
            database: "d".into(),
            port: 3306,
        };
        assert!(!format!("{descriptor:?}").contains("s3cret"));
    }
}
