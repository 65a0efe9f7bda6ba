use std::time::Instant;

use axum::{
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

/// Optional header naming the desk terminal that sent the request.
pub const DESK_HEADER: &str = "x-desk-id";

/// Log one line per request with its outcome and latency.
pub async fn trace_requests(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let desk = desk_id(req.headers()).unwrap_or("-").to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::error!(%method, %path, %desk, status, elapsed_ms, "request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, %desk, status, elapsed_ms, "request rejected");
    } else {
        tracing::info!(%method, %path, %desk, status, elapsed_ms, "request handled");
    }

    response
}

fn desk_id(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(DESK_HEADER)?.to_str().ok()?.trim();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn desk_id_ignores_blank_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(desk_id(&headers), None);

        headers.insert(DESK_HEADER, HeaderValue::from_static("  "));
        assert_eq!(desk_id(&headers), None);

        headers.insert(DESK_HEADER, HeaderValue::from_static("lobby-1"));
        assert_eq!(desk_id(&headers), Some("lobby-1"));
    }
}
