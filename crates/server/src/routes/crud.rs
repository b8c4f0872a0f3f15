use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use models::BaseEntity;
use service::GenericService;

use crate::controller::GenericController;
use crate::errors::ApiError;
use crate::response::CrudResponse;

type CrudResult<T> = Result<CrudResponse<T>, ApiError>;

/// Five CRUD endpoints for one entity, relative to wherever the router is nested:
///
/// | method | path   | operation      |
/// |--------|--------|----------------|
/// | POST   | `/`    | create         |
/// | GET    | `/`    | find all       |
/// | GET    | `/:id` | find by id     |
/// | PUT    | `/:id` | update         |
/// | DELETE | `/:id` | delete by id   |
pub fn crud_routes<T, S>(controller: GenericController<T, S>) -> Router
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized + 'static,
{
    Router::new()
        .route("/", post(create::<T, S>).get(find_all::<T, S>))
        .route(
            "/:id",
            get(find_by_id::<T, S>)
                .put(update::<T, S>)
                .delete(delete_by_id::<T, S>),
        )
        .with_state(controller)
}

async fn create<T, S>(State(ctl): State<GenericController<T, S>>, Json(entity): Json<T>) -> CrudResult<T>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    Ok(ctl.create(entity).await?)
}

async fn find_all<T, S>(State(ctl): State<GenericController<T, S>>) -> CrudResult<T>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    Ok(ctl.find_all().await?)
}

async fn find_by_id<T, S>(State(ctl): State<GenericController<T, S>>, Path(id): Path<T::Id>) -> CrudResult<T>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    Ok(ctl.find_by_id(id).await?)
}

async fn update<T, S>(
    State(ctl): State<GenericController<T, S>>,
    Path(id): Path<T::Id>,
    Json(entity): Json<T>,
) -> CrudResult<T>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    Ok(ctl.update(id, entity).await?)
}

async fn delete_by_id<T, S>(State(ctl): State<GenericController<T, S>>, Path(id): Path<T::Id>) -> CrudResult<T>
where
    T: BaseEntity,
    S: GenericService<T> + ?Sized,
{
    Ok(ctl.delete_by_id(id).await?)
}
