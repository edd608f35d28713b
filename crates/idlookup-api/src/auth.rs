//! # API Key Gate
//!
//! Every `/api/*` request must carry the shared service token in the
//! `x-api-key` header.
//!
//! ```text
//! x-api-key absent          → 401 Unauthorized (secret store untouched)
//! token resolution fails    → 500 Internal Server Error
//! x-api-key != token        → 401 Unauthorized
//! x-api-key == token        → handler
//! ```
//!
//! The expected token comes from the secret store and is cached for the
//! life of the process after the first successful fetch. A mismatch never
//! clears the cache. There is no single-flight: concurrent first requests
//! may each fetch the token, and the last write wins with the same value.

use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use idlookup_secrets::{fetch_typed, SecretError, SecretStore, SecretString, ServiceTokenSecret};
use parking_lot::RwLock;

use crate::error::{AppError, INTERNAL_SERVER_ERROR};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Resolves and caches the service token.
///
/// Injected into request extensions as `Arc<ApiKeyGate>`.
pub struct ApiKeyGate {
    secrets: Arc<dyn SecretStore>,
    secret_name: String,
    cached: RwLock<Option<SecretString>>,
}

impl fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyGate")
            .field("store", &self.secrets.store_name())
            .field("secret_name", &self.secret_name)
            .field("cached", &self.is_cached())
            .finish()
    }
}

impl ApiKeyGate {
    pub fn new(secrets: Arc<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            secrets,
            secret_name: secret_name.into(),
            cached: RwLock::new(None),
        }
    }

    /// Whether a token has been cached.
    pub fn is_cached(&self) -> bool {
        self.cached.read().is_some()
    }

    /// The expected token: cached copy, else fetched and cached.
    pub async fn service_token(&self) -> Result<SecretString, SecretError> {
        let cached = self.cached.read().clone();
        if let Some(token) = cached {
            return Ok(token);
        }

        tracing::debug!(secret = %self.secret_name, "fetching service API token");
        let secret: ServiceTokenSecret =
            fetch_typed(self.secrets.as_ref(), &self.secret_name).await?;
        if secret.token.is_blank() {
            return Err(SecretError::MissingField {
                name: self.secret_name.clone(),
                field: "token",
            });
        }

        *self.cached.write() = Some(secret.token.clone());
        Ok(secret.token)
    }

    /// Pre-fetch the token at startup. Failure is logged and the token is
    /// fetched again on the first request.
    pub async fn warm_up(&self) {
        match self.service_token().await {
            Ok(_) => tracing::info!("service API token loaded"),
            Err(e) => tracing::warn!(
                error = %e,
                "service API token not loaded, will retry on first request"
            ),
        }
    }

    /// Whether `provided` matches the service token.
    pub async fn authorize(&self, provided: &[u8]) -> Result<bool, SecretError> {
        let expected = self.service_token().await?;
        Ok(expected.matches(provided))
    }
}

/// Axum middleware enforcing the API key.
///
/// Reads the [`ApiKeyGate`] from request extensions. A request without one
/// is a wiring error and gets a 500.
pub async fn api_key_middleware(request: Request, next: Next) -> Response {
    let Some(gate) = request.extensions().get::<Arc<ApiKeyGate>>().cloned() else {
        tracing::error!("API key gate missing from request extensions");
        return internal_error();
    };

    // An empty header counts as absent and never reaches the secret store.
    let Some(provided) = request
        .headers()
        .get(API_KEY_HEADER)
        .cloned()
        .filter(|v| !v.is_empty())
    else {
        return AppError::Unauthorized.into_response();
    };

    let authorized = gate.authorize(provided.as_bytes()).await;
    match authorized {
        Ok(true) => next.run(request).await,
        Ok(false) => AppError::Unauthorized.into_response(),
        Err(e) => {
            tracing::error!(
                error = %e,
                secret = ?e.secret_name(),
                "could not resolve service API token"
            );
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR).into_response()
}
