//! Prefix routing from the gateway to the resource services.

use crate::config::GatewayRoute;
use crate::error::{AppError, ConfigError};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{
            CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER,
            TRANSFER_ENCODING, UPGRADE,
        },
        HeaderMap, HeaderName,
    },
    response::Response,
    Router,
};
use std::sync::Arc;

/// Forwarding state: shared HTTP client and route table.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    routes: Arc<Vec<GatewayRoute>>,
    body_limit: usize,
}

impl Gateway {
    /// Fails only at startup, so the error is a configuration error rather than a 502.
    pub fn new(routes: Vec<GatewayRoute>, body_limit: usize) -> Result<Self, ConfigError> {
        // Upstreams are internal services; environment proxy settings do not apply.
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| ConfigError::Validation(format!("gateway http client: {}", e)))?;
        Ok(Gateway {
            client,
            routes: Arc::new(routes),
            body_limit,
        })
    }

    pub fn routes(&self) -> &[GatewayRoute] {
        &self.routes
    }

    pub fn route_for(&self, path: &str) -> Option<&GatewayRoute> {
        match_route(&self.routes, path)
    }
}

/// Longest prefix that equals `path` or is followed by `/` in it.
pub fn match_route<'a>(routes: &'a [GatewayRoute], path: &str) -> Option<&'a GatewayRoute> {
    routes
        .iter()
        .filter(|r| {
            path.strip_prefix(r.prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
        .max_by_key(|r| r.prefix.len())
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in [CONNECTION, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE] {
        headers.remove(name);
    }
    headers.remove(HeaderName::from_static("keep-alive"));
    // Recomputed from the forwarded body.
    headers.remove(CONTENT_LENGTH);
}

/// Fallback handler: forward method, path, query, headers and body to the owning upstream.
pub async fn proxy(State(gateway): State<Gateway>, req: Request) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();
    let route = gateway
        .route_for(path)
        .ok_or_else(|| AppError::NotFound(format!("route for {}", path)))?;
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let url = format!("{}{}", route.upstream, path_and_query);

    let body = axum::body::to_bytes(body, gateway.body_limit)
        .await
        .map_err(|e| AppError::PayloadTooLarge(format!("request body: {}", e)))?;
    let mut headers = parts.headers.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(HOST);

    tracing::debug!(method = %parts.method, url = %url, "forwarding");
    let upstream = gateway
        .client
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(url = %url, error = %e, "upstream unreachable");
            AppError::Upstream(e)
        })?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Router that forwards everything it does not serve itself.
pub fn gateway_routes(gateway: Gateway) -> Router {
    Router::new().fallback(proxy).with_state(gateway)
}
