//! # Service Configuration
//!
//! All configuration comes from environment variables (a `.env` file is
//! loaded into the environment by the binary first). Secrets are never
//! read here: the configuration only names the secrets to fetch.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `8080` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_FORMAT` (`text`/`json`) | `text` |
//! | `ENV` (`dev`/`stage`/`QA`/`prod`) | `prod` |
//! | `AWS_REGION` | SDK default |
//! | `SECRET_STORE` (`aws`/`env`) | `aws` |
//! | `SERVICE_API_TOKEN_SECRET_NAME` | required |
//! | `DB_PORT` | `3306` |
//! | `ELIG_DB_HOST`, `ELIG_DB_NAME`, `ELIGIBILITY_MYSQL_SECRET_NAME` | required |
//! | `MED_DB_HOST`, `MED_DB_NAME`, `MEDICAL_MYSQL_SECRET_NAME` | required |
//! | `LEAST_COMPATIBLE_APP_VERSION` | required |

use std::collections::HashMap;
use std::str::FromStr;

use idlookup_core::{AppVersion, Database};
use idlookup_secrets::SecretError;
use thiserror::Error;

/// Environment variables naming one database's host, schema, and secret.
struct DatabaseEnvKeys {
    host: &'static str,
    name: &'static str,
    secret: &'static str,
}

const DATABASE_ENV: [(Database, DatabaseEnvKeys); 2] = [
    (
        Database::Eligibility,
        DatabaseEnvKeys {
            host: "ELIG_DB_HOST",
            name: "ELIG_DB_NAME",
            secret: "ELIGIBILITY_MYSQL_SECRET_NAME",
        },
    ),
    (
        Database::Medical,
        DatabaseEnvKeys {
            host: "MED_DB_HOST",
            name: "MED_DB_NAME",
            secret: "MEDICAL_MYSQL_SECRET_NAME",
        },
    ),
];

/// Deployment environment tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Stage,
    Qa,
    Prod,
}

impl Environment {
    /// Development machines authenticate to AWS through SSO profiles.
    pub fn uses_profile_credentials(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "stage" => Ok(Self::Stage),
            "qa" => Ok(Self::Qa),
            "prod" => Ok(Self::Prod),
            _ => Err("expected one of dev, stage, QA, prod".into()),
        }
    }
}

/// Which secret store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretBackend {
    /// AWS Secrets Manager.
    Aws,
    /// JSON documents in `IDLOOKUP_SECRET_*` environment variables.
    Env,
}

impl FromStr for SecretBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "env" => Ok(Self::Env),
            _ => Err("expected aws or env".into()),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err("expected text or json".into()),
        }
    }
}

/// Where one database lives and which secret holds its login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub name: String,
    pub secret_name: String,
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,
    pub environment: Environment,
    pub aws_region: Option<String>,
    pub secret_backend: SecretBackend,
    /// Secret holding `{"token": ...}` for the API key gate.
    pub api_token_secret_name: String,
    /// MySQL port shared by both databases.
    pub db_port: u16,
    pub databases: HashMap<Database, DatabaseSettings>,
    /// Oldest app version considered "new".
    pub min_app_version: AppVersion,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let mut databases = HashMap::new();
        for (database, keys) in &DATABASE_ENV {
            databases.insert(
                *database,
                DatabaseSettings {
                    host: require(keys.host)?,
                    name: require(keys.name)?,
                    secret_name: require(keys.secret)?,
                },
            );
        }

        Ok(Self {
            port: parse_or("PORT", get("PORT"), 8080)?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_or("LOG_FORMAT", get("LOG_FORMAT"), LogFormat::Text)?,
            environment: parse_or("ENV", get("ENV"), Environment::Prod)?,
            aws_region: get("AWS_REGION"),
            secret_backend: parse_or("SECRET_STORE", get("SECRET_STORE"), SecretBackend::Aws)?,
            api_token_secret_name: require("SERVICE_API_TOKEN_SECRET_NAME")?,
            db_port: parse_or("DB_PORT", get("DB_PORT"), 3306)?,
            databases,
            min_app_version: AppVersion::parse(&require("LEAST_COMPATIBLE_APP_VERSION")?),
        })
    }

    /// Settings for one database.
    pub fn database(&self, database: Database) -> Option<&DatabaseSettings> {
        self.databases.get(&database)
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value,
            reason: e.to_string(),
        }),
    }
}

/// Configuration and connection-parameter resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("database \"{0}\" is not configured")]
    UnknownDatabase(Database),

    #[error("could not retrieve the secrets for connection to {database}: {source}")]
    Secret {
        database: Database,
        #[source]
        source: SecretError,
    },

    #[error("secret for {database} is missing {field}")]
    IncompleteCredentials {
        database: Database,
        field: &'static str,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A full set of variables for a valid configuration.
    pub(crate) fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SERVICE_API_TOKEN_SECRET_NAME", "svc/api-token"),
            ("ELIG_DB_HOST", "elig.db.internal"),
            ("ELIG_DB_NAME", "eligibility"),
            ("ELIGIBILITY_MYSQL_SECRET_NAME", "mysql/eligibility"),
            ("MED_DB_HOST", "med.db.internal"),
            ("MED_DB_NAME", "medical"),
            ("MEDICAL_MYSQL_SECRET_NAME", "mysql/medical"),
            ("LEAST_COMPATIBLE_APP_VERSION", "5.6.2"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_port, 3306);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.secret_backend, SecretBackend::Aws);
        assert!(config.aws_region.is_none());
        assert_eq!(config.min_app_version, AppVersion::parse("5.6.2"));
    }

    #[test]
    fn every_database_gets_settings() {
        let config = load(&base_vars()).unwrap();
        for db in Database::ALL {
            assert!(config.database(db).is_some(), "missing settings for {db}");
        }
        let elig = config.database(Database::Eligibility).unwrap();
        assert_eq!(elig.host, "elig.db.internal");
        assert_eq!(elig.secret_name, "mysql/eligibility");
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = base_vars();
        vars.insert("PORT", "9090");
        vars.insert("DB_PORT", "3307");
        vars.insert("ENV", "QA");
        vars.insert("SECRET_STORE", "env");
        vars.insert("LOG_FORMAT", "json");
        vars.insert("AWS_REGION", "eu-west-1");
        let config = load(&vars).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.db_port, 3307);
        assert_eq!(config.environment, Environment::Qa);
        assert_eq!(config.secret_backend, SecretBackend::Env);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.aws_region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn missing_required_var_is_named() {
        let mut vars = base_vars();
        vars.remove("MED_DB_HOST");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::MissingVar("MED_DB_HOST"));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("LEAST_COMPATIBLE_APP_VERSION", "  ");
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::MissingVar("LEAST_COMPATIBLE_APP_VERSION")
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT", "eighty");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }), "got {err:?}");
    }

    #[test]
    fn only_dev_uses_profile_credentials() {
        assert!(Environment::Dev.uses_profile_credentials());
        assert!(!"prod".parse::<Environment>().unwrap().uses_profile_credentials());
        assert!("staging".parse::<Environment>().is_err());
    }
}
