//! HRMS services: employee, attendance, payroll and user CRUD resources with merge-patch
//! updates, plus an API gateway with a CORS boundary filter.

pub mod app;
pub mod config;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod password;
pub mod repository;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use app::{build_app, gateway_app, resource_app, with_layers};
pub use config::{load_from_env, GatewayRoute, ServerConfig, ServiceKind, StoreConfig};
pub use entity::{Attendance, Employee, Payroll, Resource, User};
pub use error::{AppError, ConfigError};
pub use gateway::Gateway;
pub use repository::{MemoryRepository, PgRepository, Repository};
pub use service::ResourceService;
pub use state::AppState;
pub use store::{ensure_database_exists, Backend};
