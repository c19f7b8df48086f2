//! Route assembly per service role.

pub mod common;
pub mod resource;

pub use common::common_routes;
pub use resource::resource_routes;

use crate::config::ServiceKind;
use crate::entity::{Attendance, Employee, Payroll, Resource, User};
use crate::service::ResourceService;
use crate::state::AppState;
use crate::store::Backend;
use axum::Router;

fn mount<E: Resource>(router: Router, backend: &Backend) -> Router {
    router.merge(resource_routes(ResourceService::<E>::new(backend.repository::<E>())))
}

/// Collection paths served by a resource role.
pub fn resource_paths(kind: ServiceKind) -> Vec<String> {
    let names = match kind {
        ServiceKind::Employee => vec![Employee::PATH],
        ServiceKind::Attendance => vec![Attendance::PATH],
        ServiceKind::Payroll => vec![Payroll::PATH],
        ServiceKind::User => vec![User::PATH],
        ServiceKind::All => vec![Employee::PATH, Attendance::PATH, Payroll::PATH, User::PATH],
        ServiceKind::Gateway => Vec::new(),
    };
    names.into_iter().map(|p| format!("/{}", p)).collect()
}

/// Common routes plus the CRUD routes of every resource the role serves. The gateway role serves none.
pub fn resource_router(kind: ServiceKind, backend: &Backend) -> Router {
    let router = common_routes(AppState::new(kind, Some(backend.clone()), resource_paths(kind)));
    match kind {
        ServiceKind::Employee => mount::<Employee>(router, backend),
        ServiceKind::Attendance => mount::<Attendance>(router, backend),
        ServiceKind::Payroll => mount::<Payroll>(router, backend),
        ServiceKind::User => mount::<User>(router, backend),
        ServiceKind::All => {
            let router = mount::<Employee>(router, backend);
            let router = mount::<Attendance>(router, backend);
            let router = mount::<Payroll>(router, backend);
            mount::<User>(router, backend)
        }
        ServiceKind::Gateway => router,
    }
}
