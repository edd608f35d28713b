//! # User Lookup API
//!
//! Read-only lookups keyed by email, EID, or employer id. Every handler
//! validates its query parameters before touching a database: a missing
//! or empty parameter is a 400 and no query runs.
//!
//! | Endpoint | Lookups |
//! |----------|---------|
//! | `GET /api/user/getEidByEmail` | eid by email |
//! | `GET /api/user/getEmailByEid` | email by eid |
//! | `GET /api/user/isEmployerUsingEid` | (employer by eid) → rules by employer |
//! | `GET /api/user/isUserUsingNewAppVersion` | uid by eid → app version by uid |

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use idlookup_core::{employer_uses_eid, AppVersion, NotFound, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppContext;

pub const MISSING_EMAIL: &str = "The request must contain an email";
pub const MISSING_EID: &str = "The request must contain an eid";
pub const EMPLOYER_OR_EID: &str =
    "The request must contain either employer Id or user Eid, but not both or none.";

/// Query string of `getEidByEmail`.
#[derive(Debug, Default, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Query string of `getEmailByEid`.
#[derive(Debug, Default, Deserialize)]
pub struct EidQuery {
    pub eid: Option<String>,
}

/// Query string of `isEmployerUsingEid`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerEidQuery {
    pub employer_id: Option<String>,
    pub user_eid: Option<String>,
}

/// Query string of `isUserUsingNewAppVersion`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEidQuery {
    pub user_eid: Option<String>,
}

/// EID of the matched user, as stored.
#[derive(Debug, Serialize, ToSchema)]
pub struct EidResponse {
    #[schema(value_type = Object)]
    pub eid: Value,
}

/// Preferred email of the matched user (shop email, else personal email).
#[derive(Debug, Serialize, ToSchema)]
pub struct EmailResponse {
    #[schema(value_type = Object)]
    pub email: Value,
}

/// Build the user lookup router.
pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/api/user/getEidByEmail", get(get_eid_by_email))
        .route("/api/user/getEmailByEid", get(get_email_by_eid))
        .route("/api/user/isEmployerUsingEid", get(is_employer_using_eid))
        .route(
            "/api/user/isUserUsingNewAppVersion",
            get(is_user_using_new_app_version),
        )
}

/// Empty parameters count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Column value as stored, `null` when absent.
fn column(record: &Record, name: &str) -> Value {
    record.get(name).cloned().unwrap_or(Value::Null)
}

/// Text of `column`, or not-found when the column is `NULL`.
fn required_column(record: &Record, column: &str) -> Result<String, NotFound> {
    record.text(column).ok_or_else(NotFound::record)
}

/// GET /api/user/getEidByEmail: EID of the user with this email.
#[utoipa::path(
    get,
    path = "/api/user/getEidByEmail",
    params(("email" = String, Query, description = "Shop or personal email")),
    responses(
        (status = 200, description = "Matching user", body = EidResponse),
        (status = 400, description = "Missing email", body = String),
        (status = 401, description = "Missing or invalid API key", body = String),
        (status = 404, description = "No matching user", body = String),
    ),
    tag = "user"
)]
pub async fn get_eid_by_email(
    State(ctx): State<AppContext>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<EidResponse>, AppError> {
    let email = present(query.email).ok_or(AppError::Validation(MISSING_EMAIL))?;
    let record = ctx.lookups.eid_by_email(&email).await?.found()?;
    Ok(Json(EidResponse {
        eid: column(&record, "eid"),
    }))
}

/// GET /api/user/getEmailByEid: Preferred email of the user with this EID.
#[utoipa::path(
    get,
    path = "/api/user/getEmailByEid",
    params(("eid" = String, Query, description = "User EID")),
    responses(
        (status = 200, description = "Matching user", body = EmailResponse),
        (status = 400, description = "Missing eid", body = String),
        (status = 401, description = "Missing or invalid API key", body = String),
        (status = 404, description = "No matching user", body = String),
    ),
    tag = "user"
)]
pub async fn get_email_by_eid(
    State(ctx): State<AppContext>,
    Query(query): Query<EidQuery>,
) -> Result<Json<EmailResponse>, AppError> {
    let eid = present(query.eid).ok_or(AppError::Validation(MISSING_EID))?;
    let record = ctx.lookups.email_by_eid(&eid).await?.found()?;
    Ok(Json(EmailResponse {
        email: column(&record, "email"),
    }))
}

/// GET /api/user/isEmployerUsingEid: Whether the employer identifies users by EID.
///
/// Exactly one of `employerId` and `userEid` must be given. With `userEid`
/// the employer is resolved first.
#[utoipa::path(
    get,
    path = "/api/user/isEmployerUsingEid",
    params(
        ("employerId" = Option<String>, Query, description = "Employer id"),
        ("userEid" = Option<String>, Query, description = "EID of one of the employer's users"),
    ),
    responses(
        (status = 200, description = "Whether the EID identifier behavior is enabled", body = bool),
        (status = 400, description = "Both or neither parameter given", body = String),
        (status = 401, description = "Missing or invalid API key", body = String),
        (status = 404, description = "Unknown user or employer", body = String),
    ),
    tag = "user"
)]
pub async fn is_employer_using_eid(
    State(ctx): State<AppContext>,
    Query(query): Query<EmployerEidQuery>,
) -> Result<Json<bool>, AppError> {
    let employer_id = match (present(query.employer_id), present(query.user_eid)) {
        (Some(employer_id), None) => employer_id,
        (None, Some(eid)) => {
            let record = ctx.lookups.employer_id_by_eid(&eid).await?.found()?;
            required_column(&record, "employer_id")?
        }
        _ => return Err(AppError::Validation(EMPLOYER_OR_EID)),
    };

    let record = ctx
        .lookups
        .eligibility_rules_by_employer_id(&employer_id)
        .await?
        .found()?;
    let rules = record.get("eligibility_rules").unwrap_or(&Value::Null);
    let uses_eid = employer_uses_eid(rules).map_err(|e| {
        AppError::Internal(format!(
            "eligibility rules for employer {employer_id} are not valid JSON: {e}"
        ))
    })?;

    tracing::debug!(%employer_id, uses_eid, "resolved employer EID usage");
    Ok(Json(uses_eid))
}

/// GET /api/user/isUserUsingNewAppVersion: Whether the user's latest app version is supported.
#[utoipa::path(
    get,
    path = "/api/user/isUserUsingNewAppVersion",
    params(("userEid" = String, Query, description = "User EID")),
    responses(
        (status = 200, description = "Whether the latest app version meets the minimum", body = bool),
        (status = 400, description = "Missing userEid", body = String),
        (status = 401, description = "Missing or invalid API key", body = String),
        (status = 404, description = "Unknown user or no recorded app version", body = String),
    ),
    tag = "user"
)]
pub async fn is_user_using_new_app_version(
    State(ctx): State<AppContext>,
    Query(query): Query<UserEidQuery>,
) -> Result<Json<bool>, AppError> {
    let eid = present(query.user_eid).ok_or(AppError::Validation(MISSING_EID))?;

    let record = ctx.lookups.uid_by_eid(&eid).await?.found()?;
    let uid = required_column(&record, "uid")?;

    let record = ctx.lookups.current_app_version_by_uid(&uid).await?.found()?;
    let version = AppVersion::parse(&required_column(&record, "current_app_ver")?);

    let is_new = version >= ctx.min_app_version;
    tracing::debug!(
        version = %version,
        minimum = %ctx.min_app_version,
        is_new,
        "compared app version"
    );
    Ok(Json(is_new))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_parameters_are_absent() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(None), None);
        assert_eq!(present(Some("E-1".into())), Some("E-1".into()));
    }

    #[test]
    fn employer_query_uses_camel_case_names() {
        let query: EmployerEidQuery =
            serde_json::from_value(serde_json::json!({"employerId": "42"})).unwrap();
        assert_eq!(query.employer_id.as_deref(), Some("42"));
        assert!(query.user_eid.is_none());
    }

    #[test]
    fn column_keeps_stored_type() {
        let record = Record::new().with("eid", 123);
        assert_eq!(column(&record, "eid"), serde_json::json!(123));
        assert_eq!(column(&record, "email"), Value::Null);
    }

    #[test]
    fn null_column_is_not_found() {
        let record = Record::new().with("uid", Value::Null);
        assert!(required_column(&record, "uid").is_err());
        let record = Record::new().with("uid", 7);
        assert_eq!(required_column(&record, "uid").unwrap(), "7");
    }
}
