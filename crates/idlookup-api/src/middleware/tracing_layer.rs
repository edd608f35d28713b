//! # Request/Response Tracing
//!
//! Every request gets an `x-request-id` (generated unless the caller sent
//! one, and echoed on the response) and a tracing span carrying method,
//! path, and request id. The query string is left out of the span since it
//! carries emails and EIDs.

use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the per-request span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id,
        )
    }
}

/// Build the `TraceLayer` for the API.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}

/// Assigns a UUID request id when the caller did not send one.
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies the request id onto the response.
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_builds_without_request_id() {
        let request = Request::builder()
            .uri("/api/user/getEidByEmail?email=a@b.c")
            .body(())
            .unwrap();
        let _span = RequestSpan.make_span(&request);
    }

    #[test]
    fn layers_construct_without_panic() {
        let _trace = layer();
        let _set = set_request_id();
        let _propagate = propagate_request_id();
    }
}
