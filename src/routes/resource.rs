//! CRUD routes for one resource: `/{path}` and `/{path}/:id`.
//! PUT and PATCH share the same merge-patch handler.

use crate::entity::Resource;
use crate::handlers::resource::{create, delete as delete_handler, list, read, update};
use crate::service::ResourceService;
use axum::{routing::get, Router};

pub fn resource_routes<E: Resource>(service: ResourceService<E>) -> Router {
    let collection = format!("/{}", E::PATH);
    let member = format!("/{}/:id", E::PATH);
    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>))
        .route(
            &member,
            get(read::<E>)
                .put(update::<E>)
                .patch(update::<E>)
                .delete(delete_handler::<E>),
        )
        .with_state(service)
}
