//! # OpenAPI Specification Assembly
//!
//! Serves the utoipa-generated document at `/openapi.json`, behind the API key
//! gate like every other `/api` route.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::API_KEY_HEADER;
use crate::state::AppContext;

/// Assembled OpenAPI document for the lookup API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Identity Lookup API",
        version = "0.1.0",
        description = "Read-only user lookups over the eligibility and medical databases.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::user::get_eid_by_email,
        crate::routes::user::get_email_by_eid,
        crate::routes::user::is_employer_using_eid,
        crate::routes::user::is_user_using_new_app_version,
    ),
    components(schemas(
        crate::routes::user::EidResponse,
        crate::routes::user::EmailResponse,
    )),
    modifiers(&ApiKeySecurity),
    security(("api_key" = [])),
    tags(
        (name = "user", description = "User identity lookups"),
    )
)]
pub struct ApiDoc;

/// Registers the `x-api-key` header scheme.
struct ApiKeySecurity;

impl Modify for ApiKeySecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppContext> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
