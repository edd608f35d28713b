//! # Database Identifiers
//!
//! The service reads from exactly two logical MySQL databases. Adding a
//! third is one variant here plus one row in each table keyed by
//! [`Database`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A logical database the service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    /// Eligibility list and employer rules.
    Eligibility,
    /// B2B user mapping and app session history.
    Medical,
}

impl Database {
    /// Every known database, in connection order.
    pub const ALL: [Database; 2] = [Database::Eligibility, Database::Medical];

    /// Stable identifier used in logs and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eligibility => "eligibility",
            Self::Medical => "medical",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A database identifier that does not name a known database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("database \"{0}\" does not exist")]
pub struct UnknownDatabase(pub String);

impl FromStr for Database {
    type Err = UnknownDatabase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Database::ALL
            .into_iter()
            .find(|db| db.as_str() == s)
            .ok_or_else(|| UnknownDatabase(s.to_string()))
    }
}
