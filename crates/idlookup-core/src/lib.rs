#![deny(missing_docs)]

//! # idlookup-core: Foundational Types for the Identity Lookup Service
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies and performs no I/O.
//!
//! ## Design Principles
//!
//! 1. **Closed database identifier.** [`Database`] is a two-variant enum.
//!    Per-database data lives in tables keyed by it, never in string
//!    comparisons.
//!
//! 2. **Explicit lookup outcomes.** A lookup either found a row
//!    ([`Lookup::Found`]) or did not ([`Lookup::Missing`]). Infrastructure
//!    failures are a separate type, [`QueryError`], so callers never have
//!    to inspect message text to tell the two apart.
//!
//! 3. **Numeric version ordering.** [`AppVersion`] compares dotted versions
//!    component-wise as integers with implicit zero padding.

pub mod database;
pub mod eligibility;
pub mod error;
pub mod lookup;
pub mod version;

pub use database::{Database, UnknownDatabase};
pub use eligibility::{employer_uses_eid, EID_IDENTIFIER_BEHAVIOR};
pub use error::QueryError;
pub use lookup::{Lookup, NotFound, Record, RECORD_NOT_FOUND};
pub use version::{compare_versions, AppVersion};
