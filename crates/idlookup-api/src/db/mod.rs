//! # Database Layer
//!
//! The service reads from two MySQL databases, one persistent connection
//! each. Connections are opened once at startup from credentials in the
//! secret store and are never re-established: once a connection is closed,
//! queries against that database fail with [`QueryError::NotConnected`].
//!
//! Handlers never touch connections directly. They go through
//! [`QueryExecutor`], implemented by [`ConnectionManager`] for MySQL and
//! by [`InMemoryExecutor`] for development and tests.
//!
//! Queries on one database are serialized by an async mutex around its
//! connection. There is no pooling, retry, or timeout at this layer.

pub mod memory;
pub mod queries;
pub mod resolver;
pub mod row;

use std::collections::HashMap;

use async_trait::async_trait;
use idlookup_core::{Database, QueryError, Record};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySqlConnection};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::ConfigError;

pub use memory::InMemoryExecutor;
pub use resolver::{ConnectionDescriptor, DbConfigResolver};

/// Runs parametrized statements against a named database.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `statement` with positional string `params`.
    ///
    /// Rows come back in result order.
    async fn query(
        &self,
        database: Database,
        statement: &str,
        params: &[String],
    ) -> Result<Vec<Record>, QueryError>;

    /// Check that `database` is reachable.
    async fn ping(&self, database: Database) -> Result<(), QueryError>;

    /// Release every connection. Called once on shutdown.
    async fn shutdown(&self) {}
}

/// Failure to open the database connections at startup.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to connect to {database}: {message}")]
    Connection { database: Database, message: String },
}

/// Failure to close a connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("no connection configured for database {0}")]
    UnknownDatabase(Database),

    #[error("database {0} is already disconnected")]
    AlreadyClosed(Database),

    #[error("error while closing {database}: {message}")]
    Close { database: Database, message: String },
}

/// One persistent MySQL connection per database.
pub struct ConnectionManager {
    connections: HashMap<Database, Mutex<Option<MySqlConnection>>>,
}

impl ConnectionManager {
    /// Resolve credentials for and open a connection to every database in
    /// `databases`, stopping at the first failure.
    pub async fn connect(
        resolver: &DbConfigResolver,
        databases: &[Database],
    ) -> Result<Self, ConnectError> {
        let mut connections = HashMap::with_capacity(databases.len());
        for &database in databases {
            let descriptor = resolver.resolve(database).await?;
            let connection = open(database, &descriptor).await?;
            connections.insert(database, Mutex::new(Some(connection)));
        }
        Ok(Self { connections })
    }

    fn slot(&self, database: Database) -> Result<&Mutex<Option<MySqlConnection>>, QueryError> {
        self.connections
            .get(&database)
            .ok_or(QueryError::UnknownDatabase(database))
    }

    /// Close the connection to `database`.
    pub async fn disconnect(&self, database: Database) -> Result<(), DisconnectError> {
        let slot = self
            .connections
            .get(&database)
            .ok_or(DisconnectError::UnknownDatabase(database))?;
        let connection = slot
            .lock()
            .await
            .take()
            .ok_or(DisconnectError::AlreadyClosed(database))?;

        connection.close().await.map_err(|e| {
            tracing::error!(%database, error = %e, "error while disconnecting from database");
            DisconnectError::Close {
                database,
                message: e.to_string(),
            }
        })?;
        tracing::info!(%database, "disconnected from database");
        Ok(())
    }

    /// Close every open connection, logging failures.
    pub async fn disconnect_all(&self) {
        for database in Database::ALL {
            match self.disconnect(database).await {
                Ok(()) | Err(DisconnectError::UnknownDatabase(_)) => {}
                Err(e) => tracing::warn!(%database, error = %e, "disconnect skipped"),
            }
        }
    }
}

async fn open(
    database: Database,
    descriptor: &ConnectionDescriptor,
) -> Result<MySqlConnection, ConnectError> {
    let options = MySqlConnectOptions::new()
        .host(&descriptor.host)
        .port(descriptor.port)
        .username(&descriptor.user)
        .password(descriptor.password.expose())
        .database(&descriptor.database);

    match MySqlConnection::connect_with(&options).await {
        Ok(connection) => {
            tracing::info!(%database, host = %descriptor.host, "connected to database");
            Ok(connection)
        }
        Err(e) => {
            tracing::error!(%database, host = %descriptor.host, error = %e, "database connection failed");
            Err(ConnectError::Connection {
                database,
                message: e.to_string(),
            })
        }
    }
}

#[async_trait]
impl QueryExecutor for ConnectionManager {
    async fn query(
        &self,
        database: Database,
        statement: &str,
        params: &[String],
    ) -> Result<Vec<Record>, QueryError> {
        let mut guard = self.slot(database)?.lock().await;
        let connection = guard.as_mut().ok_or(QueryError::NotConnected(database))?;

        let mut query = sqlx::query(statement);
        for param in params {
            query = query.bind(param.as_str());
        }

        let driver_error = |e: sqlx::Error| {
            tracing::error!(%database, statement, error = %e, "query failed");
            QueryError::Driver {
                database,
                message: e.to_string(),
            }
        };

        let rows = query.fetch_all(&mut *connection).await.map_err(driver_error)?;
        rows.iter()
            .map(|r| row::record_from_row(r).map_err(driver_error))
            .collect()
    }

    async fn ping(&self, database: Database) -> Result<(), QueryError> {
        let mut guard = self.slot(database)?.lock().await;
        let connection = guard.as_mut().ok_or(QueryError::NotConnected(database))?;
        connection.ping().await.map_err(|e| QueryError::Driver {
            database,
            message: e.to_string(),
        })
    }

    async fn shutdown(&self) {
        self.disconnect_all().await;
    }
}
