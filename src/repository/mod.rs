//! Storage collaborator: generic CRUD over one resource table, keyed by the identity column.

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use crate::entity::Resource;
use crate::error::AppError;
use async_trait::async_trait;

/// Change applied to a stored row inside [`Repository::modify`].
pub type Modify<E> = Box<dyn FnOnce(&mut E) -> Result<(), AppError> + Send>;

#[async_trait]
pub trait Repository<E: Resource>: Send + Sync {
    /// Every row, in identity order.
    async fn find_all(&self) -> Result<Vec<E>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError>;

    /// Insert a new row. Any id on `entity` is ignored; the stored row with its assigned id is returned.
    async fn insert(&self, entity: E) -> Result<E, AppError>;

    /// Fetch, apply `change`, save, as one unit. Returns None (and writes nothing) when no row has `id`.
    async fn modify(&self, id: i64, change: Modify<E>) -> Result<Option<E>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
