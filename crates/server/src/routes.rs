use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use models::item::Item;
use service::GenericService;

use crate::controller::GenericController;
use crate::metrics;

pub mod crud;

/// Controller for the sample entity; the backend behind it is picked at startup.
pub type ItemController = GenericController<Item, dyn GenericService<Item>>;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the application router: health, metrics and the item CRUD endpoints.
pub fn build_router(items: ItemController, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics))
        .nest("/api/items", crud::crud_routes(items))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use service::{storage::memory::MemoryRepository, GenericServiceImpl};
    use tower::ServiceExt;

    fn app() -> Router {
        let repo = Arc::new(MemoryRepository::<Item>::new());
        let service: Arc<dyn GenericService<Item>> = Arc::new(GenericServiceImpl::<Item, _>::new(repo));
        build_router(GenericController::new("item", service), CorsLayer::very_permissive())
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    async fn read(res: axum::response::Response) -> (StatusCode, String) {
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = read(app().oneshot(empty_request(Method::GET, "/health")).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let app = app();

        let res = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/items",
                serde_json::json!({"name": "Test Name", "description": "Test Description"}),
            ))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(created, serde_json::json!({"id": 1, "name": "Test Name", "description": "Test Description"}));

        let (status, body) = read(app.oneshot(empty_request(Method::GET, "/api/items/1")).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<serde_json::Value>(&body).unwrap(), created);
    }

    #[tokio::test]
    async fn missing_entity_is_plain_text_404() {
        let app = app();
        for req in [
            empty_request(Method::GET, "/api/items/42"),
            empty_request(Method::DELETE, "/api/items/42"),
            json_request(Method::PUT, "/api/items/42", serde_json::json!({"name": "n", "description": "d"})),
        ] {
            let (status, body) = read(app.clone().oneshot(req).await.unwrap()).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, "Entity with id 42 not found");
        }
    }

    #[tokio::test]
    async fn update_uses_path_id() {
        let app = app();
        app.clone()
            .oneshot(json_request(Method::POST, "/api/items", serde_json::json!({"name": "a", "description": "b"})))
            .await
            .unwrap();

        let res = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                "/api/items/1",
                serde_json::json!({"id": 7, "name": "Updated Name", "description": "Updated Description"}),
            ))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({"id": 1, "name": "Updated Name", "description": "Updated Description"})
        );

        let (_, body) = read(app.oneshot(empty_request(Method::GET, "/api/items")).await.unwrap()).await;
        let all: Vec<Item> = serde_json::from_str(&body).unwrap();
        assert_eq!(all, vec![Item::new(Some(1), "Updated Name", "Updated Description")]);
    }

    #[tokio::test]
    async fn delete_then_gone() {
        let app = app();
        app.clone()
            .oneshot(json_request(Method::POST, "/api/items", serde_json::json!({"name": "a", "description": "b"})))
            .await
            .unwrap();

        let (status, body) = read(app.clone().oneshot(empty_request(Method::DELETE, "/api/items/1")).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Entity with id 1 deleted successfully");

        let (status, _) = read(app.oneshot(empty_request(Method::GET, "/api/items/1")).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let res = app().oneshot(empty_request(Method::GET, "/api/items/abc")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn metrics_exposed() {
        let app = app();
        app.clone().oneshot(empty_request(Method::GET, "/api/items")).await.unwrap();
        let (status, body) = read(app.oneshot(empty_request(Method::GET, "/metrics")).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("crud_requests_total"));
    }

    /// Entity keyed by a UUID, mounted the same way as `Item`.
    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Note {
        id: Option<uuid::Uuid>,
        text: String,
    }

    impl models::BaseEntity for Note {
        type Id = uuid::Uuid;

        fn id(&self) -> Option<&uuid::Uuid> {
            self.id.as_ref()
        }

        fn set_id(&mut self, id: Option<uuid::Uuid>) {
            self.id = id;
        }
    }

    fn note_app() -> Router {
        let repo = Arc::new(MemoryRepository::<Note>::new());
        let service = Arc::new(GenericServiceImpl::<Note, _>::new(repo));
        Router::new().nest("/api/notes", crud::crud_routes(GenericController::new("note", service)))
    }

    #[tokio::test]
    async fn uuid_keyed_entity_round_trip() {
        let app = note_app();

        let res = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/notes", serde_json::json!({"text": "remember"})))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Note = serde_json::from_str(&body).unwrap();
        let id = created.id.expect("store assigns a uuid");
        assert_eq!(created.text, "remember");

        let (status, body) = read(app.clone().oneshot(empty_request(Method::GET, &format!("/api/notes/{id}"))).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Note>(&body).unwrap(), created);

        let res = app
            .clone()
            .oneshot(json_request(Method::PUT, &format!("/api/notes/{id}"), serde_json::json!({"text": "edited"})))
            .await
            .unwrap();
        let (status, body) = read(res).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Note>(&body).unwrap(), Note { id: Some(id), text: "edited".into() });

        let (status, body) = read(app.clone().oneshot(empty_request(Method::DELETE, &format!("/api/notes/{id}"))).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("Entity with id {id} deleted successfully"));

        let (status, body) = read(app.oneshot(empty_request(Method::GET, &format!("/api/notes/{id}"))).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, format!("Entity with id {id} not found"));
    }

    #[tokio::test]
    async fn uuid_keyed_entity_rejects_malformed_id() {
        let app = note_app();

        let res = app.clone().oneshot(empty_request(Method::GET, "/api/notes/42")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let unknown = uuid::Uuid::new_v4();
        let (status, body) = read(app.oneshot(empty_request(Method::GET, &format!("/api/notes/{unknown}"))).await.unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, format!("Entity with id {unknown} not found"));
    }
}
