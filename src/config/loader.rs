//! Load server config from environment variables (after `.env` has been applied by the caller).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/hrms";
pub const DEFAULT_SCHEMA: &str = "hrms";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Resource services on their default local ports.
pub fn default_gateway_routes() -> Vec<GatewayRoute> {
    vec![
        GatewayRoute::new("/employees", "http://127.0.0.1:8081"),
        GatewayRoute::new("/attendance", "http://127.0.0.1:8082"),
        GatewayRoute::new("/payroll", "http://127.0.0.1:8083"),
        GatewayRoute::new("/users", "http://127.0.0.1:8084"),
    ]
}

/// Load and validate from the process environment.
pub fn load_from_env() -> Result<ServerConfig, ConfigError> {
    load_with(|key| std::env::var(key).ok())
}

/// Load and validate using `lookup` for each variable. Empty values count as unset.
pub fn load_with<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let service: ServiceKind = match var("HRMS_SERVICE") {
        Some(s) => s.parse()?,
        None => ServiceKind::All,
    };

    let bind_addr: SocketAddr = match var("HRMS_BIND") {
        Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
            key: "HRMS_BIND",
            value: s,
        })?,
        None => SocketAddr::from(([0, 0, 0, 0], service.default_port())),
    };

    let store = match var("HRMS_STORE").as_deref().map(str::to_lowercase).as_deref() {
        None | Some("postgres") => StoreConfig::Postgres {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            schema: var("HRMS_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
            max_connections: parse_number("HRMS_DB_MAX_CONNECTIONS", var("HRMS_DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?,
        },
        Some("memory") => StoreConfig::Memory,
        Some(other) => {
            return Err(ConfigError::Invalid {
                key: "HRMS_STORE",
                value: other.to_string(),
            })
        }
    };

    let gateway_routes = match var("HRMS_GATEWAY_ROUTES") {
        Some(s) => parse_gateway_routes(&s)?,
        None => default_gateway_routes(),
    };

    let body_limit = parse_number("HRMS_BODY_LIMIT", var("HRMS_BODY_LIMIT"), DEFAULT_BODY_LIMIT)?;

    let config = ServerConfig {
        service,
        bind_addr,
        store,
        gateway_routes,
        body_limit,
    };
    validate(&config)?;
    Ok(config)
}

/// Parse `prefix=url,prefix=url`. Trailing slashes on upstreams are dropped.
pub fn parse_gateway_routes(s: &str) -> Result<Vec<GatewayRoute>, ConfigError> {
    s.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (prefix, upstream) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
                key: "HRMS_GATEWAY_ROUTES",
                value: entry.to_string(),
            })?;
            Ok(GatewayRoute::new(
                prefix.trim(),
                upstream.trim().trim_end_matches('/'),
            ))
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(s) => s.parse().map_err(|_| ConfigError::Invalid { key, value: s }),
        None => Ok(default),
    }
}
