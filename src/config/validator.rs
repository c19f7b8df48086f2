//! Config validation: identifiers, gateway routes, limits.

use crate::config::{ServerConfig, ServiceKind, StoreConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid identifier regex"))
}

pub fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if let StoreConfig::Postgres {
        schema,
        max_connections,
        ..
    } = &config.store
    {
        if !identifier_re().is_match(schema) {
            return Err(ConfigError::Validation(format!(
                "schema '{}' must be a plain identifier",
                schema
            )));
        }
        if *max_connections == 0 {
            return Err(ConfigError::Validation("max connections must be at least 1".into()));
        }
    }

    if config.body_limit == 0 {
        return Err(ConfigError::Validation("body limit must be positive".into()));
    }

    if config.service == ServiceKind::Gateway && config.gateway_routes.is_empty() {
        return Err(ConfigError::Validation("gateway requires at least one route".into()));
    }

    let mut seen = HashSet::new();
    for route in &config.gateway_routes {
        if !route.prefix.starts_with('/') || route.prefix.len() < 2 || route.prefix.ends_with('/') {
            return Err(ConfigError::Validation(format!(
                "gateway prefix '{}' must start with '/' and name a path",
                route.prefix
            )));
        }
        if !(route.upstream.starts_with("http://") || route.upstream.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "gateway upstream '{}' must be an http(s) URL",
                route.upstream
            )));
        }
        if !seen.insert(route.prefix.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate gateway prefix: {}",
                route.prefix
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_gateway_routes, GatewayRoute};

    fn config() -> ServerConfig {
        ServerConfig {
            service: ServiceKind::Gateway,
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            store: StoreConfig::Postgres {
                database_url: "postgres://localhost/hrms".into(),
                schema: "hrms".into(),
                max_connections: 5,
            },
            gateway_routes: default_gateway_routes(),
            body_limit: 1024,
        }
    }

    #[test]
    fn default_config_is_valid() {
        validate(&config()).unwrap();
    }

    #[test]
    fn schema_must_be_identifier() {
        let mut c = config();
        c.store = StoreConfig::Postgres {
            database_url: "postgres://localhost/hrms".into(),
            schema: "hrms; DROP TABLE users".into(),
            max_connections: 5,
        };
        assert!(matches!(validate(&c), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn gateway_needs_routes() {
        let mut c = config();
        c.gateway_routes.clear();
        assert!(validate(&c).is_err());
        c.service = ServiceKind::Employee;
        validate(&c).unwrap();
    }

    #[test]
    fn route_shape_is_checked() {
        for bad in [
            GatewayRoute::new("employees", "http://x"),
            GatewayRoute::new("/", "http://x"),
            GatewayRoute::new("/employees/", "http://x"),
            GatewayRoute::new("/employees", "ftp://x"),
        ] {
            let mut c = config();
            c.gateway_routes = vec![bad.clone()];
            assert!(validate(&c).is_err(), "{:?}", bad);
        }
        let mut c = config();
        c.gateway_routes.push(GatewayRoute::new("/users", "http://other"));
        assert!(validate(&c).is_err());
    }
}
