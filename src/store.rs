//! Backing store selection, database bootstrap and resource table DDL.

use crate::config::StoreConfig;
use crate::entity::Resource;
use crate::error::{AppError, ConfigError};
use crate::repository::{MemoryRepository, PgRepository, Repository};
use crate::sql;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;

/// Where resource rows live. Cheap to clone.
#[derive(Clone, Debug)]
pub enum Backend {
    Postgres { pool: PgPool, schema: String },
    Memory,
}

impl Backend {
    /// Connect according to config. For PostgreSQL the database is created if missing and the schema ensured.
    pub async fn connect(config: &StoreConfig) -> Result<Self, AppError> {
        match config {
            StoreConfig::Memory => Ok(Backend::Memory),
            StoreConfig::Postgres {
                database_url,
                schema,
                max_connections,
            } => {
                ensure_database_exists(database_url).await?;
                let pool = PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url)
                    .await?;
                sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(schema)))
                    .execute(&pool)
                    .await?;
                Ok(Backend::Postgres {
                    pool,
                    schema: schema.clone(),
                })
            }
        }
    }

    /// Create the table for `E` if it does not exist. No-op for the memory store.
    pub async fn ensure_table<E: Resource>(&self) -> Result<(), AppError> {
        if let Backend::Postgres { pool, schema } = self {
            sqlx::query(&sql::create_table::<E>(schema))
                .execute(pool)
                .await?;
            tracing::info!(table = E::TABLE, schema = %schema, "table ready");
        }
        Ok(())
    }

    /// Repository for `E`. Each call on the memory store returns a fresh, empty table.
    pub fn repository<E: Resource>(&self) -> Arc<dyn Repository<E>> {
        match self {
            Backend::Postgres { pool, schema } => Arc::new(PgRepository::<E>::new(pool.clone(), schema.clone())),
            Backend::Memory => Arc::new(MemoryRepository::<E>::new()),
        }
    }

    /// Readiness probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        if let Backend::Postgres { pool, .. } = self {
            sqlx::query("SELECT 1").fetch_optional(pool).await?;
        }
        Ok(())
    }
}

fn invalid_url(database_url: &str) -> AppError {
    ConfigError::Invalid {
        key: "DATABASE_URL",
        value: database_url.to_string(),
    }
    .into()
}

/// Create the database named in `database_url` if the server does not have it yet.
/// Runs on a one-off connection to the `postgres` maintenance database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url).ok_or_else(|| invalid_url(database_url))?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = PgConnectOptions::from_str(&admin_url)
        .map_err(|_| invalid_url(database_url))?
        .connect()
        .await?;
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(db_name)
        .fetch_optional(&mut conn)
        .await?;
    if found.is_none() {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// `postgres://host/db?opts` → (`postgres://host/postgres?opts`, `db`).
fn split_database_url(url: &str) -> Option<(String, &str)> {
    let (base, path) = url.rsplit_once('/')?;
    if !base.contains("://") || base.ends_with('/') {
        return None;
    }
    let (db_name, query) = match path.split_once('?') {
        Some((name, query)) => (name, Some(query)),
        None => (path, None),
    };
    let admin_url = match query {
        Some(q) => format!("{}/postgres?{}", base, q),
        None => format!("{}/postgres", base),
    };
    Some((admin_url, db_name.trim()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Employee;

    #[test]
    fn database_url_is_split_into_admin_url_and_name() {
        let (admin, name) = split_database_url("postgres://u:p@db:5432/hrms?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@db:5432/postgres?sslmode=disable");
        assert_eq!(name, "hrms");

        let (admin, name) = split_database_url("postgres://localhost/hrms").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(name, "hrms");

        assert!(split_database_url("postgres://localhost").is_none());
        assert!(split_database_url("hrms").is_none());
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("hrms"), "\"hrms\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[tokio::test]
    async fn memory_backend_is_always_ready() {
        let backend = Backend::Memory;
        backend.ping().await.unwrap();
        backend.ensure_table::<Employee>().await.unwrap();
        let repo = backend.repository::<Employee>();
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
