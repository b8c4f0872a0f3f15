use std::{marker::PhantomData, sync::Arc};

use async_trait::async_trait;
use models::BaseEntity;
use tracing::debug;

use crate::errors::ServiceError;
use crate::generic::repository::GenericRepository;

/// Per-entity service contract.
///
/// Mirrors [`GenericRepository`] operation for operation. Implementations are
/// the place for business rules (validation, auditing, authorization); the
/// controller and the datastore do not change when they are added.
#[async_trait]
pub trait GenericService<T: BaseEntity>: Send + Sync {
    async fn save(&self, entity: T) -> Result<T, ServiceError>;
    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<T>, ServiceError>;
    async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError>;
    async fn delete(&self, entity: &T) -> Result<(), ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
}

/// Pass-through service: each call goes straight to the repository and its
/// result, error included, comes back unchanged.
pub struct GenericServiceImpl<T, R: ?Sized> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R: ?Sized> GenericServiceImpl<T, R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo, _entity: PhantomData }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }
}

impl<T, R: ?Sized> Clone for GenericServiceImpl<T, R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo), _entity: PhantomData }
    }
}

#[async_trait]
impl<T, R> GenericService<T> for GenericServiceImpl<T, R>
where
    T: BaseEntity,
    R: GenericRepository<T> + ?Sized,
{
    async fn save(&self, entity: T) -> Result<T, ServiceError> {
        debug!(id = ?entity.id(), "service save");
        self.repo.save(entity).await
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError> {
        debug!(%id, "service find_by_id");
        self.repo.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        self.repo.find_all().await
    }

    async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError> {
        debug!(%id, "service delete_by_id");
        self.repo.delete_by_id(id).await
    }

    async fn delete(&self, entity: &T) -> Result<(), ServiceError> {
        self.repo.delete(entity).await
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        self.repo.count().await
    }
}
