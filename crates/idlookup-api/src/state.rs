//! # Application Context
//!
//! Everything a request needs, built once at startup and shared by clone.
//! Lifecycle is explicit: [`bootstrap`](crate::bootstrap::bootstrap) builds
//! the context, [`AppContext::shutdown`] releases the database connections.

use std::sync::Arc;

use idlookup_core::{AppVersion, Database, QueryError};

use crate::auth::ApiKeyGate;
use crate::db::QueryExecutor;
use crate::lookups::LookupService;

/// Shared application context passed to handlers as axum state.
#[derive(Clone)]
pub struct AppContext {
    pub lookups: LookupService,
    pub gate: Arc<ApiKeyGate>,
    /// Oldest app version considered "new".
    pub min_app_version: AppVersion,
    executor: Arc<dyn QueryExecutor>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("gate", &self.gate)
            .field("min_app_version", &self.min_app_version.as_str())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Assemble a context from already-initialized parts.
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        gate: Arc<ApiKeyGate>,
        min_app_version: AppVersion,
    ) -> Self {
        Self {
            lookups: LookupService::new(executor.clone()),
            gate,
            min_app_version,
            executor,
        }
    }

    /// Ping every database.
    pub async fn check_ready(&self) -> Result<(), QueryError> {
        for database in Database::ALL {
            self.executor.ping(database).await?;
        }
        Ok(())
    }

    /// Close the database connections.
    pub async fn shutdown(&self) {
        tracing::info!("shutting down database connections");
        self.executor.shutdown().await;
    }
}
