//! Request metrics middleware.
//!
//! Times every request and records it into
//! `http_server_requests_seconds{method, route, status_code}`. The route
//! label is normalized and allow-list-capped before observation so request
//! paths can never blow up label cardinality.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use blockwatch_telemetry::metrics::HTTP_REQUEST_SECONDS;
use blockwatch_telemetry::route_label;

pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUEST_SECONDS
        .with_label_values(&[&method, &route_label(&path), &status])
        .observe(started.elapsed().as_secs_f64());

    response
}
