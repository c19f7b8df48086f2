//! Server configuration types.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Which service a process runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Employee,
    Attendance,
    Payroll,
    User,
    /// CORS filter plus forwarding to the resource services.
    Gateway,
    /// All four resources and the CORS filter in one process.
    All,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Employee => "employee",
            ServiceKind::Attendance => "attendance",
            ServiceKind::Payroll => "payroll",
            ServiceKind::User => "user",
            ServiceKind::Gateway => "gateway",
            ServiceKind::All => "all",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Gateway | ServiceKind::All => 8080,
            ServiceKind::Employee => 8081,
            ServiceKind::Attendance => 8082,
            ServiceKind::Payroll => 8083,
            ServiceKind::User => 8084,
        }
    }

    /// Whether responses pass through the CORS filter.
    pub fn applies_cors(self) -> bool {
        matches!(self, ServiceKind::Gateway | ServiceKind::All)
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" | "employees" => Ok(ServiceKind::Employee),
            "attendance" => Ok(ServiceKind::Attendance),
            "payroll" => Ok(ServiceKind::Payroll),
            "user" | "users" => Ok(ServiceKind::User),
            "gateway" => Ok(ServiceKind::Gateway),
            "all" => Ok(ServiceKind::All),
            _ => Err(ConfigError::Invalid {
                key: "HRMS_SERVICE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    Postgres {
        database_url: String,
        /// Schema holding the resource tables. Must be a plain identifier.
        schema: String,
        max_connections: u32,
    },
    Memory,
}

/// Requests whose path is `prefix` or starts with `prefix/` go to `upstream`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRoute {
    pub prefix: String,
    pub upstream: String,
}

impl GatewayRoute {
    pub fn new(prefix: impl Into<String>, upstream: impl Into<String>) -> Self {
        GatewayRoute {
            prefix: prefix.into(),
            upstream: upstream.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub service: ServiceKind,
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub gateway_routes: Vec<GatewayRoute>,
    /// Max request body bytes.
    pub body_limit: usize,
}
