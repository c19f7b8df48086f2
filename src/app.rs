//! Application assembly: store bootstrap, routers and the HTTP layer stack for a service role.

use crate::config::{ServerConfig, ServiceKind};
use crate::entity::{Attendance, Employee, Payroll, User};
use crate::error::AppError;
use crate::gateway::{cors_filter, gateway_routes, Gateway};
use crate::routes::{common_routes, resource_router};
use crate::state::AppState;
use crate::store::Backend;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Request id generator for `x-request-id`.
#[derive(Clone, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The body limit layer answers oversized requests that declare `Content-Length` with a
/// plain-text 413 before any handler runs; give them the JSON error body instead.
async fn json_payload_too_large(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge("length limit exceeded".into()).into_response();
    }
    response
}

/// Create the tables the role serves.
pub async fn ensure_tables(kind: ServiceKind, backend: &Backend) -> Result<(), AppError> {
    match kind {
        ServiceKind::Employee => backend.ensure_table::<Employee>().await,
        ServiceKind::Attendance => backend.ensure_table::<Attendance>().await,
        ServiceKind::Payroll => backend.ensure_table::<Payroll>().await,
        ServiceKind::User => backend.ensure_table::<User>().await,
        ServiceKind::All => {
            backend.ensure_table::<Employee>().await?;
            backend.ensure_table::<Attendance>().await?;
            backend.ensure_table::<Payroll>().await?;
            backend.ensure_table::<User>().await
        }
        ServiceKind::Gateway => Ok(()),
    }
}

/// Router for a resource role (or `all`) on an already connected backend, with layers applied.
pub async fn resource_app(kind: ServiceKind, backend: &Backend, body_limit: usize) -> Result<Router, AppError> {
    ensure_tables(kind, backend).await?;
    Ok(with_layers(resource_router(kind, backend), kind, body_limit))
}

/// Gateway router: local operational routes, everything else forwarded, CORS outermost.
pub fn gateway_app(gateway: Gateway, body_limit: usize) -> Router {
    let prefixes = gateway.routes().iter().map(|r| r.prefix.clone()).collect();
    let state = AppState::new(ServiceKind::Gateway, None, prefixes);
    let router = common_routes(state).merge(gateway_routes(gateway));
    with_layers(router, ServiceKind::Gateway, body_limit)
}

/// Build the full application for `config`, connecting to the store when the role needs one.
pub async fn build_app(config: &ServerConfig) -> Result<Router, AppError> {
    match config.service {
        ServiceKind::Gateway => {
            for route in &config.gateway_routes {
                tracing::info!(prefix = %route.prefix, upstream = %route.upstream, "gateway route");
            }
            let gateway = Gateway::new(config.gateway_routes.clone(), config.body_limit)?;
            Ok(gateway_app(gateway, config.body_limit))
        }
        kind => {
            let backend = Backend::connect(&config.store).await?;
            resource_app(kind, &backend, config.body_limit).await
        }
    }
}

/// Body limit, tracing and request ids; the CORS filter wraps everything for roles that apply it.
pub fn with_layers(router: Router, kind: ServiceKind, body_limit: usize) -> Router {
    let router = router
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::map_response(json_payload_too_large))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(XRequestId));
    if kind.applies_cors() {
        router.layer(middleware::from_fn(cors_filter))
    } else {
        router
    }
}
