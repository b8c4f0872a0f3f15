use std::{marker::PhantomData, sync::Arc};

use axum::http::StatusCode;
use models::BaseEntity;
use service::{GenericService, ServiceError};
use tracing::{error, info, instrument};

use crate::metrics;
use crate::response::CrudResponse;

/// Request-oriented CRUD operations for one entity type.
///
/// The only branching here is the presence check: reads map a missing record
/// to 404, and delete/update look the record up first so a missing id yields
/// 404 instead of a silent no-op or an upsert. Nothing between that check and
/// the write is coordinated; concurrent requests on the same id may race.
pub struct GenericController<T, S: ?Sized> {
    service: Arc<S>,
    entity: &'static str,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for GenericController<T, S> {
    fn clone(&self) -> Self {
        Self { service: Arc::clone(&self.service), entity: self.entity, _entity: PhantomData }
    }
}

impl<T, S> GenericController<T, S>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    /// `entity` labels logs and metrics (e.g. `"item"`).
    pub fn new(entity: &'static str, service: Arc<S>) -> Self {
        Self { service, entity, _entity: PhantomData }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Persist a new entity. The incoming id is expected to be unset; it is not checked.
    #[instrument(skip_all, fields(entity = self.entity))]
    pub async fn create(&self, entity: T) -> Result<CrudResponse<T>, ServiceError> {
        let saved = self.service.save(entity).await.map_err(|e| self.fault("create", e))?;
        info!(id = ?saved.id(), "entity created");
        Ok(self.finish("create", CrudResponse::entity(StatusCode::CREATED, saved)))
    }

    #[instrument(skip_all, fields(entity = self.entity, id = %id))]
    pub async fn find_by_id(&self, id: T::Id) -> Result<CrudResponse<T>, ServiceError> {
        let found = self.service.find_by_id(&id).await.map_err(|e| self.fault("find_by_id", e))?;
        let response = match found {
            Some(entity) => CrudResponse::entity(StatusCode::OK, entity),
            None => CrudResponse::not_found(&id),
        };
        Ok(self.finish("find_by_id", response))
    }

    /// Every stored entity; an empty store is still 200.
    #[instrument(skip_all, fields(entity = self.entity))]
    pub async fn find_all(&self) -> Result<CrudResponse<T>, ServiceError> {
        let entities = self.service.find_all().await.map_err(|e| self.fault("find_all", e))?;
        info!(count = entities.len(), "entities listed");
        Ok(self.finish("find_all", CrudResponse::entities(StatusCode::OK, entities)))
    }

    #[instrument(skip_all, fields(entity = self.entity, id = %id))]
    pub async fn delete_by_id(&self, id: T::Id) -> Result<CrudResponse<T>, ServiceError> {
        let existing = self.service.find_by_id(&id).await.map_err(|e| self.fault("delete_by_id", e))?;
        if existing.is_none() {
            return Ok(self.finish("delete_by_id", CrudResponse::not_found(&id)));
        }
        self.service.delete_by_id(&id).await.map_err(|e| self.fault("delete_by_id", e))?;
        info!("entity deleted");
        Ok(self.finish(
            "delete_by_id",
            CrudResponse::message(StatusCode::OK, format!("Entity with id {id} deleted successfully")),
        ))
    }

    /// Replace the stored entity with `entity`, forcing its id to `id`.
    ///
    /// Full replacement: fields of the stored record are not merged in.
    #[instrument(skip_all, fields(entity = self.entity, id = %id))]
    pub async fn update(&self, id: T::Id, mut entity: T) -> Result<CrudResponse<T>, ServiceError> {
        let existing = self.service.find_by_id(&id).await.map_err(|e| self.fault("update", e))?;
        if existing.is_none() {
            return Ok(self.finish("update", CrudResponse::not_found(&id)));
        }
        entity.set_id(Some(id));
        let updated = self.service.save(entity).await.map_err(|e| self.fault("update", e))?;
        info!("entity updated");
        Ok(self.finish("update", CrudResponse::entity(StatusCode::OK, updated)))
    }

    fn finish(&self, operation: &str, response: CrudResponse<T>) -> CrudResponse<T> {
        metrics::record(self.entity, operation, response.status);
        response
    }

    fn fault(&self, operation: &str, e: ServiceError) -> ServiceError {
        error!(entity = self.entity, operation, error = %e, "datastore fault");
        metrics::record(self.entity, operation, StatusCode::INTERNAL_SERVER_ERROR);
        e
    }
}
