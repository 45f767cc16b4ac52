//! Pre-shared key guard for the console API.
//!
//! Keys are compared in constant time with `subtle`.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{ConsoleError, ErrorResponse};

/// Header name for the console key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware that admits a request only if it presents the console key.
///
/// With no key configured every request is admitted.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    match presented_key(request.headers()) {
        Some(key) if constant_time_compare(key, &expected) => next.run(request).await,
        Some(_) => unauthorized_response("Invalid API key"),
        None => unauthorized_response("Missing API key"),
    }
}

/// The key from `x-api-key`, else from a bearer `Authorization` header.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    let err = ConsoleError::Unauthorized(message.to_string());
    (err.status_code(), Json(ErrorResponse::new(&err, 0))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("console-key-123", "console-key-123"));
        assert!(!constant_time_compare("console-key-123", "console-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_api_key_header_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-bearer"),
        );
        assert_eq!(presented_key(&headers), Some("from-header"));

        headers.remove(API_KEY_HEADER);
        assert_eq!(presented_key(&headers), Some("from-bearer"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(presented_key(&headers), None);
    }
}
