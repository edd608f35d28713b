//! In-memory [`QueryExecutor`] for development and tests.
//!
//! Result sets are registered per `(database, statement, params)`. A
//! statement with no matching registration returns zero rows. Every call is
//! recorded so tests can assert which lookups ran.

use std::collections::HashMap;

use async_trait::async_trait;
use idlookup_core::{Database, QueryError, Record};
use parking_lot::RwLock;

use super::QueryExecutor;

type Key = (Database, String, Vec<String>);

/// A query that reached the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedQuery {
    pub database: Database,
    pub statement: String,
    pub params: Vec<String>,
}

/// Canned result sets keyed by statement and parameters.
#[derive(Default)]
pub struct InMemoryExecutor {
    rows: RwLock<HashMap<Key, Vec<Record>>>,
    failures: RwLock<HashMap<Database, String>>,
    log: RwLock<Vec<ExecutedQuery>>,
}

impl InMemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows returned for `statement` run with `params`.
    pub fn with_rows(
        self,
        database: Database,
        statement: &str,
        params: &[&str],
        rows: Vec<Record>,
    ) -> Self {
        let key = (
            database,
            statement.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        );
        self.rows.write().insert(key, rows);
        self
    }

    /// Make every query against `database` fail with a driver error.
    pub fn with_failure(self, database: Database, message: &str) -> Self {
        self.failures.write().insert(database, message.to_string());
        self
    }

    /// Queries executed so far, in order.
    pub fn executed(&self) -> Vec<ExecutedQuery> {
        self.log.read().clone()
    }
}

#[async_trait]
impl QueryExecutor for InMemoryExecutor {
    async fn query(
        &self,
        database: Database,
        statement: &str,
        params: &[String],
    ) -> Result<Vec<Record>, QueryError> {
        self.log.write().push(ExecutedQuery {
            database,
            statement: statement.to_string(),
            params: params.to_vec(),
        });

        if let Some(message) = self.failures.read().get(&database) {
            return Err(QueryError::Driver {
                database,
                message: message.clone(),
            });
        }

        let key = (database, statement.to_string(), params.to_vec());
        Ok(self.rows.read().get(&key).cloned().unwrap_or_default())
    }

    async fn ping(&self, database: Database) -> Result<(), QueryError> {
        match self.failures.read().get(&database) {
            Some(message) => Err(QueryError::Driver {
                database,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_rows_match_on_params() {
        let executor = InMemoryExecutor::new().with_rows(
            Database::Medical,
            "SELECT uid FROM t WHERE eid = ?",
            &["E-1"],
            vec![Record::new().with("uid", 7)],
        );

        let hit = executor
            .query(Database::Medical, "SELECT uid FROM t WHERE eid = ?", &["E-1".into()])
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        let miss = executor
            .query(Database::Medical, "SELECT uid FROM t WHERE eid = ?", &["E-2".into()])
            .await
            .unwrap();
        assert!(miss.is_empty());
        assert_eq!(executor.executed().len(), 2);
    }

    #[tokio::test]
    async fn failure_applies_to_one_database() {
        let executor = InMemoryExecutor::new().with_failure(Database::Eligibility, "gone away");
        let err = executor
            .query(Database::Eligibility, "SELECT 1", &[])
            .await
            .unwrap_err();
        assert_eq!(err.database(), Database::Eligibility);
        assert!(executor.ping(Database::Eligibility).await.is_err());
        assert!(executor.ping(Database::Medical).await.is_ok());
    }
}
