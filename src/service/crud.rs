//! Resource operations: list, get, create, merge-patch update, delete.

use crate::entity::Resource;
use crate::error::AppError;
use crate::repository::Repository;
use std::sync::Arc;

pub struct ResourceService<E: Resource> {
    repo: Arc<dyn Repository<E>>,
}

impl<E: Resource> Clone for ResourceService<E> {
    fn clone(&self) -> Self {
        ResourceService {
            repo: self.repo.clone(),
        }
    }
}

impl<E: Resource> ResourceService<E> {
    pub fn new(repo: Arc<dyn Repository<E>>) -> Self {
        ResourceService { repo }
    }

    /// Every stored row; empty store gives an empty list.
    pub async fn list_all(&self) -> Result<Vec<E>, AppError> {
        let rows = self.repo.find_all().await?;
        tracing::debug!(resource = E::NAME, count = rows.len(), "listed");
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<E, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found::<E>(id))
    }

    /// Insert a row built from the patch. Identity comes from the store.
    pub async fn create(&self, patch: E::Patch) -> Result<E, AppError> {
        let entity = E::from_patch(E::prepare(patch)?);
        let saved = self.repo.insert(entity).await?;
        tracing::debug!(resource = E::NAME, id = saved.id(), "created");
        Ok(saved)
    }

    /// Merge the patch into the stored row: present fields overwrite, absent or null fields are kept.
    /// The patch is prepared first so the store lock covers only fetch, merge and save.
    pub async fn update(&self, id: i64, patch: E::Patch) -> Result<E, AppError> {
        let patch = E::prepare(patch)?;
        let saved = self
            .repo
            .modify(
                id,
                Box::new(move |entity: &mut E| {
                    entity.merge(patch);
                    Ok(())
                }),
            )
            .await?
            .ok_or_else(|| not_found::<E>(id))?;
        tracing::debug!(resource = E::NAME, id, "updated");
        Ok(saved)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(not_found::<E>(id));
        }
        tracing::debug!(resource = E::NAME, id, "deleted");
        Ok(())
    }
}

fn not_found<E: Resource>(id: i64) -> AppError {
    tracing::warn!(resource = E::NAME, id, "not found");
    AppError::record_not_found(E::NAME, id)
}
