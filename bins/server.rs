use std::process::ExitCode;

use configs::AppConfig;
use tokio::runtime::Runtime;
use tracing::{error, info};
use uuid::Uuid;

/// Log panics through tracing, tagged with this process instance.
fn install_panic_hook(instance: Uuid) {
    let pid = std::process::id();
    std::panic::set_hook(Box::new(move |panic| {
        error!(service = "server", event = "panic", %instance, pid, message = %panic, "unhandled panic");
    }));
}

/// Multi-threaded runtime sized by `[server] worker_threads`.
fn build_runtime(cfg: &AppConfig) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env first, so RUST_LOG, LOG_FORMAT and the config overrides apply
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    install_panic_hook(instance);

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %format!("{e:#}"), "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %instance,
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "starting"
    );

    // returns after Ctrl+C once in-flight requests have drained
    match rt.block_on(server::serve(cfg)) {
        Ok(()) => {
            info!(service = "server", event = "stop", %instance, "stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", %instance, error = %format!("{e:#}"), "server exited with error");
            ExitCode::FAILURE
        }
    }
}
