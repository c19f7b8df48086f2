//! Operational routes shared by every role: `/health`, `/ready`, `/version`, `/info`.

use crate::state::AppState;
use crate::store::Backend;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Status {
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

#[derive(Serialize)]
struct Info {
    name: &'static str,
    version: &'static str,
    service: &'static str,
    store: &'static str,
    resources: Vec<String>,
}

async fn health() -> Json<Status> {
    Json(Status { status: "ok" })
}

/// 503 while the database does not answer. The memory store and the gateway are always ready.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let Some(backend @ Backend::Postgres { .. }) = &state.backend else {
        return (StatusCode::OK, Json(Readiness { status: "ok", database: None }));
    };
    match backend.ping().await {
        Ok(()) => (StatusCode::OK, Json(Readiness { status: "ok", database: Some("ok") })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness { status: "degraded", database: Some("unavailable") }),
            )
        }
    }
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn info(State(state): State<AppState>) -> Json<Info> {
    let store = match &state.backend {
        Some(Backend::Postgres { .. }) => "postgres",
        Some(Backend::Memory) => "memory",
        None => "none",
    };
    Json(Info {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        service: state.service.as_str(),
        store,
        resources: state.resources,
    })
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/info", get(info))
        .with_state(state)
}
