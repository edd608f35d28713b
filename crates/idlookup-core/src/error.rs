//! # Query Errors
//!
//! Transport-level failures while running a lookup. A query that runs and
//! matches nothing is not an error here; see [`crate::Lookup`].

use thiserror::Error;

use crate::database::Database;

/// Failure to execute a statement against a database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No connection slot exists for this database.
    #[error("no connection configured for database {0}")]
    UnknownDatabase(Database),

    /// The connection was closed and will not be re-established.
    #[error("database {0} is not connected")]
    NotConnected(Database),

    /// The driver reported an error while executing the statement.
    #[error("query against {database} failed: {message}")]
    Driver {
        /// Database the statement ran against.
        database: Database,
        /// Driver error text.
        message: String,
    },
}

impl QueryError {
    /// Database the failure relates to.
    pub fn database(&self) -> Database {
        match self {
            Self::UnknownDatabase(db) | Self::NotConnected(db) => *db,
            Self::Driver { database, .. } => *database,
        }
    }
}
