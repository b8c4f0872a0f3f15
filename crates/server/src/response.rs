use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Payload of a CRUD outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum CrudBody<T> {
    Entity(T),
    Entities(Vec<T>),
    /// Plain-text outcome such as "Entity with id 1 not found".
    Message(String),
}

/// Transport-agnostic result of a controller operation: a status plus a body.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudResponse<T> {
    pub status: StatusCode,
    pub body: CrudBody<T>,
}

impl<T> CrudResponse<T> {
    pub fn entity(status: StatusCode, entity: T) -> Self {
        Self { status, body: CrudBody::Entity(entity) }
    }

    pub fn entities(status: StatusCode, entities: Vec<T>) -> Self {
        Self { status, body: CrudBody::Entities(entities) }
    }

    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: CrudBody::Message(message.into()) }
    }

    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::message(StatusCode::NOT_FOUND, format!("Entity with id {id} not found"))
    }
}

impl<T: Serialize> IntoResponse for CrudResponse<T> {
    fn into_response(self) -> Response {
        match self.body {
            CrudBody::Entity(entity) => (self.status, Json(entity)).into_response(),
            CrudBody::Entities(entities) => (self.status, Json(entities)).into_response(),
            CrudBody::Message(msg) => (self.status, msg).into_response(),
        }
    }
}
