use std::{future::Future, net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::{Migrator, MigratorTrait};
use models::item::Item;
use service::{
    storage::{json_file::JsonFileRepository, memory::MemoryRepository, seaorm::SeaOrmItemRepository},
    GenericService, GenericServiceImpl,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::controller::GenericController;
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Item service over the datastore selected by `[storage] backend`.
pub async fn build_item_service(cfg: &AppConfig) -> Result<Arc<dyn GenericService<Item>>, StartupError> {
    let service: Arc<dyn GenericService<Item>> = match cfg.storage.backend {
        StorageBackend::Memory => {
            let repo = Arc::new(MemoryRepository::<Item>::new());
            Arc::new(GenericServiceImpl::<Item, _>::new(repo))
        }
        StorageBackend::Json => {
            common::env::ensure_data_dir(&cfg.storage.data_dir).await?;
            let path = Path::new(&cfg.storage.data_dir).join("items.json");
            let repo = JsonFileRepository::<Item>::new(path).await?;
            Arc::new(GenericServiceImpl::<Item, _>::new(repo))
        }
        StorageBackend::Database => {
            let repo = SeaOrmItemRepository::connect(&cfg.database).await?;
            Migrator::up(&repo.db, None)
                .await
                .map_err(|e| StartupError::Migration(e.to_string()))?;
            Arc::new(GenericServiceImpl::<Item, _>::new(Arc::new(repo)))
        }
    };
    info!(backend = ?cfg.storage.backend, "item datastore ready");
    Ok(service)
}

/// Wire datastore, service, controller and routes for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let items = GenericController::new("item", build_item_service(cfg).await?);
    Ok(routes::build_router(items, build_cors()))
}

/// Serve `app` on `listener` until `shutdown` resolves, then stop accepting
/// connections and let in-flight requests finish.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received, draining in-flight requests"),
        Err(e) => {
            error!(error = %e, "cannot listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Build the app for `cfg` and serve it until Ctrl+C.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "listening");
    serve_until(listener, app, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
