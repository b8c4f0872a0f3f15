use std::{io::ErrorKind, path::{Path, PathBuf}, sync::Arc};

use async_trait::async_trait;
use models::{BaseEntity, GeneratedId};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use super::Records;
use crate::errors::ServiceError;
use crate::generic::repository::GenericRepository;

/// JSON file-backed datastore.
///
/// Keeps the records in memory and rewrites the whole file after every
/// mutation, while still holding the write lock. A mutation is applied to a
/// copy first and only becomes visible once the file write succeeded, so a
/// failed write changes neither the file nor the in-memory state.
/// Intended for small data sets where a database is overkill.
#[derive(Clone)]
pub struct JsonFileRepository<T> {
    inner: Arc<RwLock<Records<T>>>,
    file_path: PathBuf,
}

impl<T> JsonFileRepository<T>
where
    T: BaseEntity,
    T::Id: GeneratedId,
{
    /// Open the store at `path`. Creates the file (and parent directories) when missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }

        let records: Records<T> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(storage_err)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Records::default();
                write_records(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(storage_err(e)),
        };
        debug!(path = %file_path.display(), count = records.len(), "json store opened");

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(records)), file_path }))
    }
}

/// Write to a sibling temp file, then rename it over `path`; readers never see a partial document.
async fn write_records<T: serde::Serialize>(path: &Path, records: &Records<T>) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(records).map_err(storage_err)?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, data).await.map_err(storage_err)?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(storage_err(e));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn storage_err(e: impl std::fmt::Display) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

#[async_trait]
impl<T> GenericRepository<T> for JsonFileRepository<T>
where
    T: BaseEntity,
    T::Id: GeneratedId,
{
    async fn save(&self, entity: T) -> Result<T, ServiceError> {
        let mut records = self.inner.write().await;
        let mut next = records.clone();
        let saved = next.save(entity)?;
        write_records(&self.file_path, &next).await?;
        *records = next;
        Ok(saved)
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, ServiceError> {
        Ok(self.inner.read().await.find(id))
    }

    async fn find_all(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.inner.read().await.all())
    }

    async fn delete_by_id(&self, id: &T::Id) -> Result<(), ServiceError> {
        let mut records = self.inner.write().await;
        let mut next = records.clone();
        if next.remove(id) {
            write_records(&self.file_path, &next).await?;
            *records = next;
        }
        Ok(())
    }

    async fn delete(&self, entity: &T) -> Result<(), ServiceError> {
        match entity.id() {
            Some(id) => self.delete_by_id(id).await,
            None => Ok(()),
        }
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.inner.read().await.len())
    }
}
