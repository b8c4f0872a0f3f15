use std::sync::Arc;

use async_trait::async_trait;
use models::{BaseEntity, GeneratedId};
use tokio::sync::RwLock;

use super::Records;
use crate::errors::ServiceError;
use crate::generic::repository::GenericRepository;

/// Process-local datastore.
///
/// Needs nothing from the identifier beyond equality and [`GeneratedId`];
/// `find_all` returns records in insertion order.
#[derive(Clone)]
pub struct MemoryRepository<T> {
    inner: Arc<RwLock<Records<T>>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(Records::default())) }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> GenericRepository<T> for MemoryRepository<T>
where
    T: BaseEntity,
    T::Id: GeneratedId,
{
    async fn save(&self, entity: T) -> Result<T, ServiceError> {
        self.inner.write().await.save(entity)
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError> {
        Ok(self.inner.read().await.find(id))
    }

    async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.inner.read().await.all())
    }

    async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError> {
        self.inner.write().await.remove(id);
        Ok(())
    }

    async fn delete(&self, entity: &T) -> Result<(), ServiceError> {
        if let Some(id) = entity.id() {
            self.inner.write().await.remove(id);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.inner.read().await.len())
    }
}
