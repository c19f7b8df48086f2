//! Resource CRUD handlers, generic over the entity type.

use crate::entity::Resource;
use crate::error::AppError;
use crate::response::{created, no_content, ok, ok_many};
use crate::service::ResourceService;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Body must be a JSON object whose fields match the patch types. Unknown fields (including `id`) are ignored.
fn parse_patch<P: DeserializeOwned>(body: Result<Json<Value>, JsonRejection>) -> Result<P, AppError> {
    let Json(value) = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::BadRequest(e.body_text())
        }
    })?;
    if !value.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn list<E: Resource>(
    State(service): State<ResourceService<E>>,
) -> Result<impl IntoResponse, AppError> {
    let rows = service.list_all().await?;
    Ok(ok_many(rows))
}

pub async fn read<E: Resource>(
    State(service): State<ResourceService<E>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = service.get_by_id(id).await?;
    Ok(ok(row))
}

pub async fn create<E: Resource>(
    State(service): State<ResourceService<E>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let patch: E::Patch = parse_patch(body)?;
    let row = service.create(patch).await?;
    Ok(created(row))
}

pub async fn update<E: Resource>(
    State(service): State<ResourceService<E>>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let patch: E::Patch = parse_patch(body)?;
    let row = service.update(id, patch).await?;
    Ok(ok(row))
}

pub async fn delete<E: Resource>(
    State(service): State<ResourceService<E>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    service.delete_by_id(id).await?;
    Ok(no_content())
}
