//! PostgreSQL repository on a shared `PgPool`.

use crate::entity::Resource;
use crate::error::AppError;
use crate::repository::{Modify, Repository};
use crate::sql;
use async_trait::async_trait;
use sqlx::PgPool;
use std::marker::PhantomData;

pub struct PgRepository<E> {
    pool: PgPool,
    schema: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgRepository {
            pool,
            schema: schema.into(),
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        PgRepository {
            pool: self.pool.clone(),
            schema: self.schema.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Resource> Repository<E> for PgRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        let sql = sql::select_all::<E>(&self.schema);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        let sql = sql::select_by_id::<E>(&self.schema, false);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, entity: E) -> Result<E, AppError> {
        let sql = sql::insert::<E>(&self.schema);
        tracing::debug!(sql = %sql, "query");
        let row = entity
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn modify(&self, id: i64, change: Modify<E>) -> Result<Option<E>, AppError> {
        let select = sql::select_by_id::<E>(&self.schema, true);
        let update = sql::update::<E>(&self.schema);
        tracing::debug!(sql = %select, id, "query (tx)");
        let mut tx = self.pool.begin().await?;
        let current = sqlx::query_as::<_, E>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut entity) = current else {
            tx.rollback().await?;
            return Ok(None);
        };
        // Dropping `tx` on error rolls back and releases the row lock.
        change(&mut entity)?;
        tracing::debug!(sql = %update, id, "query (tx)");
        let saved = entity
            .bind_columns(sqlx::query_as::<_, E>(&update))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(saved))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let sql = sql::delete::<E>(&self.schema);
        tracing::debug!(sql = %sql, id, "query");
        let deleted: Option<i64> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted.is_some())
    }
}
