use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub const REQUEST_HEADER: &str = "x-request-id";
const CORRELATION_HEADER: &str = "x-correlation-id";
const FORWARD_HEADER: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "n-a";

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Runs the request inside a span tagged with its request id and client address,
/// and echoes the request id back to the caller.
pub async fn track_request(request: Request, next: Next) -> Response {
    let headers = request.headers();
    let request_id = header(headers, REQUEST_HEADER)
        .or_else(|| header(headers, CORRELATION_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let client_ip = header(headers, FORWARD_HEADER)
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let span = info_span!("request", request_id = %request_id, client_ip = %client_ip);
    async move {
        info!("Requested - {}", request.uri().path());
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
