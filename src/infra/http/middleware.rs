//! Per-request tracing: every request runs inside a span tagged with a fresh
//! request id, which is echoed back in `x-request-id`. Failed responses are
//! logged once, with the [`ErrorReport`] their handler attached.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn trace_requests(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started_at = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    let report = response.extensions_mut().remove::<ErrorReport>();
    let elapsed_ms = started_at.elapsed().as_millis();
    span.in_scope(|| log_outcome(response.status(), &query, elapsed_ms, report.as_ref()));

    response
}

fn log_outcome(status: StatusCode, query: &str, elapsed_ms: u128, report: Option<&ErrorReport>) {
    if !status.is_client_error() && !status.is_server_error() {
        debug!(
            target = "showcase::http::response",
            status = status.as_u16(),
            elapsed_ms,
            "request served"
        );
        return;
    }

    let origin = report.map_or("unknown", |report| report.origin);
    let detail = report.map_or("no diagnostic available", ErrorReport::detail);
    let collection = report.and_then(|report| report.collection.as_deref());
    let chain = report.map(|report| report.chain.as_slice()).unwrap_or_default();

    if status.is_server_error() {
        error!(
            target = "showcase::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            origin,
            collection,
            detail,
            chain = ?chain,
            "request failed"
        );
    } else {
        warn!(
            target = "showcase::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            origin,
            collection,
            detail,
            "client request error"
        );
    }
}
