//! In-process repository. Backs the `memory` store and the test suites.

use crate::entity::Resource;
use crate::error::AppError;
use crate::repository::{Modify, Repository};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

pub struct MemoryRepository<E> {
    table: RwLock<Table<E>>,
}

impl<E> MemoryRepository<E> {
    pub fn new() -> Self {
        MemoryRepository {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl<E> Default for MemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Resource> Repository<E> for MemoryRepository<E> {
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, mut entity: E) -> Result<E, AppError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        entity.set_id(id);
        table.rows.insert(id, entity.clone());
        Ok(entity)
    }

    async fn modify(&self, id: i64, change: Modify<E>) -> Result<Option<E>, AppError> {
        // Write guard spans fetch, change and save.
        let mut table = self.table.write().await;
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        change(&mut updated)?;
        updated.set_id(id);
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
