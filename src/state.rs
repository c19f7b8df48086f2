//! State behind the operational routes of every role.

use crate::config::ServiceKind;
use crate::store::Backend;

#[derive(Clone, Debug)]
pub struct AppState {
    pub service: ServiceKind,
    /// None for the gateway, which keeps no rows.
    pub backend: Option<Backend>,
    /// Path prefixes this process answers for, served or forwarded.
    pub resources: Vec<String>,
}

impl AppState {
    pub fn new(service: ServiceKind, backend: Option<Backend>, resources: Vec<String>) -> Self {
        AppState {
            service,
            backend,
            resources,
        }
    }
}
