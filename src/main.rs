//! BlockShare Server: file sharing with block/unblock requests.
//!
//! Main entry point that wires all crates together and starts the server.

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use blockshare_api::{AppState, build_app};
use blockshare_core::config::AppConfig;
use blockshare_core::error::AppError;
use blockshare_database::Database;
use blockshare_service::ServiceContainer;
use blockshare_worker::{CronScheduler, PurgeJobHandler};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `APP_ENV` overlay and `BLOCKSHARE__*` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging. `RUST_LOG` overrides `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting BlockShare v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage backend (+ migrations) ───────────────────
    let database = Database::connect(&config.database).await?;
    tracing::info!(backend = database.kind(), "Storage backend ready");

    // ── Step 2: Services and the file event listener ─────────────
    let (services, events) = ServiceContainer::new(database.repositories(), &config.files);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener_handle = tokio::spawn(services.listener().run(events, shutdown_rx));

    // ── Step 3: Purge scheduler ──────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let purge = PurgeJobHandler::new(services.files.clone(), config.worker.retention_days);
        let scheduler = CronScheduler::new(purge).await?;
        scheduler
            .register_default_tasks(&config.worker.purge_cron)
            .await?;
        scheduler.start().await?;
        tracing::info!(
            cron = %config.worker.purge_cron,
            retention_days = config.worker.retention_days,
            "Purge scheduler started"
        );
        Some(scheduler)
    } else {
        tracing::info!("Purge scheduler disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_addr();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, database.clone(), &services);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("BlockShare server listening on {addr}");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if tokio::time::timeout(grace, listener_handle).await.is_err() {
        tracing::warn!("File event listener did not stop within the grace period");
    }

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler shutdown failed");
        }
    }

    database.close().await;
    tracing::info!("BlockShare server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
