//! CORS boundary filter. Runs outermost: reflects the request `Origin` on every response and
//! answers preflight `OPTIONS` requests itself.

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH, HEAD";
pub const MAX_AGE_SECS: &str = "3600";

/// Set the CORS headers for `origin`. `insert` drops any values set by inner layers or
/// upstream services, so each header appears exactly once.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));
}

/// Middleware for `axum::middleware::from_fn`. Without `Origin` the request passes through untouched.
pub async fn cors_filter(req: Request, next: Next) -> Response {
    let Some(origin) = req.headers().get(ORIGIN).cloned() else {
        return next.run(req).await;
    };
    if req.method() == Method::OPTIONS {
        tracing::debug!(origin = ?origin, path = %req.uri().path(), "preflight");
        let mut response = StatusCode::OK.into_response();
        apply_cors_headers(response.headers_mut(), &origin);
        return response;
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut(), &origin);
    response
}
