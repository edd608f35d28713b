//! # Lookup Service
//!
//! One method per lookup. Each runs a single statement through the
//! [`QueryExecutor`] and keeps only the first row. Zero rows become
//! [`Lookup::Missing`]; driver failures stay `Err` and are logged here.

use std::sync::Arc;

use idlookup_core::{Database, Lookup, QueryError, Record};

use crate::db::queries;
use crate::db::QueryExecutor;

/// Single-row lookups over the eligibility and medical databases.
#[derive(Clone)]
pub struct LookupService {
    executor: Arc<dyn QueryExecutor>,
}

impl LookupService {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// `{eid}` of the user whose shop email or email is `email`.
    pub async fn eid_by_email(&self, email: &str) -> Result<Lookup<Record>, QueryError> {
        self.first(
            "eid_by_email",
            Database::Eligibility,
            queries::EID_BY_EMAIL,
            &[email, email],
        )
        .await
    }

    /// `{email}` for `eid`, preferring the shop email.
    pub async fn email_by_eid(&self, eid: &str) -> Result<Lookup<Record>, QueryError> {
        self.first("email_by_eid", Database::Eligibility, queries::EMAIL_BY_EID, &[eid])
            .await
    }

    /// `{employer_id}` for `eid`.
    pub async fn employer_id_by_eid(&self, eid: &str) -> Result<Lookup<Record>, QueryError> {
        self.first(
            "employer_id_by_eid",
            Database::Eligibility,
            queries::EMPLOYER_ID_BY_EID,
            &[eid],
        )
        .await
    }

    /// `{eligibility_rules}` for the employer.
    pub async fn eligibility_rules_by_employer_id(
        &self,
        employer_id: &str,
    ) -> Result<Lookup<Record>, QueryError> {
        self.first(
            "eligibility_rules_by_employer_id",
            Database::Eligibility,
            queries::ELIGIBILITY_RULES_BY_EMPLOYER_ID,
            &[employer_id],
        )
        .await
    }

    /// `{uid}` for `eid` from the medical database.
    pub async fn uid_by_eid(&self, eid: &str) -> Result<Lookup<Record>, QueryError> {
        self.first("uid_by_eid", Database::Medical, queries::UID_BY_EID, &[eid])
            .await
    }

    /// `{current_app_ver}` from the most recent session of `uid`.
    pub async fn current_app_version_by_uid(
        &self,
        uid: &str,
    ) -> Result<Lookup<Record>, QueryError> {
        self.first(
            "current_app_version_by_uid",
            Database::Medical,
            queries::CURRENT_APP_VERSION_BY_UID,
            &[uid],
        )
        .await
    }

    async fn first(
        &self,
        lookup: &'static str,
        database: Database,
        statement: &str,
        params: &[&str],
    ) -> Result<Lookup<Record>, QueryError> {
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        tracing::debug!(lookup, %database, "running lookup");

        let rows = self
            .executor
            .query(database, statement, &params)
            .await
            .map_err(|e| {
                tracing::error!(lookup, %database, error = %e, "lookup failed");
                e
            })?;

        let outcome = Lookup::first_of(rows);
        if !outcome.is_found() {
            tracing::info!(lookup, %database, "no matching record");
        }
        Ok(outcome)
    }
}
