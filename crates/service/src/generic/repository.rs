use async_trait::async_trait;
use models::BaseEntity;

use crate::errors::ServiceError;

/// Datastore contract for one entity type.
///
/// Every mutation is visible to subsequent calls on the same handle.
#[async_trait]
pub trait GenericRepository<T: BaseEntity>: Send + Sync {
    /// Persist `entity`. An unset id gets a fresh one; a set id overwrites
    /// (or creates) the record with that id. Returns the stored entity.
    async fn save(&self, entity: T) -> Result<T, ServiceError>;

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError>;

    async fn find_all(&self) -> Result<Vec<T>, ServiceError>;

    /// No-op when nothing has that id.
    async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError>;

    /// Remove the record matching the entity's id; no-op for an unset id.
    async fn delete(&self, entity: &T) -> Result<(), ServiceError>;

    async fn count(&self) -> Result<u64, ServiceError>;
}

/// Call-recording repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use models::GeneratedId;

    use crate::storage::memory::MemoryRepository;

    /// Repository operation as seen by [`RecordingRepository`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum RepoCall<T: BaseEntity> {
        Save(T),
        FindById(T::Id),
        FindAll,
        DeleteById(T::Id),
        Delete(T),
        Count,
    }

    /// Memory-backed repository that logs every call it receives.
    pub struct RecordingRepository<T: BaseEntity> {
        inner: MemoryRepository<T>,
        calls: Mutex<Vec<RepoCall<T>>>,
    }

    impl<T: BaseEntity> Default for RecordingRepository<T> {
        fn default() -> Self {
            Self { inner: MemoryRepository::new(), calls: Mutex::new(Vec::new()) }
        }
    }

    impl<T: BaseEntity> RecordingRepository<T> {
        pub fn calls(&self) -> Vec<RepoCall<T>> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: RepoCall<T>) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl<T> GenericRepository<T> for RecordingRepository<T>
    where
        T: BaseEntity,
        T::Id: GeneratedId,
    {
        async fn save(&self, entity: T) -> Result<T, ServiceError> {
            self.record(RepoCall::Save(entity.clone()));
            self.inner.save(entity).await
        }

        async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError> {
            self.record(RepoCall::FindById(id.clone()));
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
            self.record(RepoCall::FindAll);
            self.inner.find_all().await
        }

        async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError> {
            self.record(RepoCall::DeleteById(id.clone()));
            self.inner.delete_by_id(id).await
        }

        async fn delete(&self, entity: &T) -> Result<(), ServiceError> {
            self.record(RepoCall::Delete(entity.clone()));
            self.inner.delete(entity).await
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            self.record(RepoCall::Count);
            self.inner.count().await
        }
    }
}
