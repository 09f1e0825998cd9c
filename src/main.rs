//! ProjectHub Server: project catalog writes and event-driven notifications.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use projecthub_api::AppState;
use projecthub_auth::{IdentityResolver, TokenVerifier};
use projecthub_core::config::{AppConfig, DatabaseProvider};
use projecthub_core::error::AppError;
use projecthub_database::memory::{MemoryCatalogStore, MemoryNotificationStore};
use projecthub_database::repositories::{CatalogRepository, NotificationRepository};
use projecthub_database::{CatalogStore, DatabasePool, NotificationStore};
use projecthub_service::{FileAttacher, HttpFileAttacher, NotificationService, SagaCoordinator};
use projecthub_worker::{NotificationIngestor, QueueConsumer};

#[tokio::main]
async fn main() {
    let env = std::env::var("PROJECTHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
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
    tracing::info!("Starting ProjectHub v{}", env!("CARGO_PKG_VERSION"));
    let config = Arc::new(config);

    // ── Step 1: Stores ───────────────────────────────────────────
    let (catalog_store, notification_store, db_pool): (
        Arc<dyn CatalogStore>,
        Arc<dyn NotificationStore>,
        Option<DatabasePool>,
    ) = match config.database.provider {
        DatabaseProvider::Postgres => {
            tracing::info!("Connecting to database...");
            let db_pool = DatabasePool::connect(&config.database).await?;

            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                projecthub_database::migration::run_migrations(db_pool.pool()).await?;
                tracing::info!("Database migrations complete");
            }

            let catalog: Arc<dyn CatalogStore> =
                Arc::new(CatalogRepository::new(db_pool.pool().clone()));
            let notifications: Arc<dyn NotificationStore> =
                Arc::new(NotificationRepository::new(db_pool.pool().clone()));
            (catalog, notifications, Some(db_pool))
        }
        DatabaseProvider::Memory => {
            tracing::warn!("Using in-memory stores; nothing survives a restart");
            let catalog: Arc<dyn CatalogStore> = Arc::new(MemoryCatalogStore::new());
            let notifications: Arc<dyn NotificationStore> =
                Arc::new(MemoryNotificationStore::new());
            (catalog, notifications, None)
        }
    };

    // ── Step 2: Identity resolution ──────────────────────────────
    let verifier = Arc::new(TokenVerifier::new(&config.auth));
    let identity_resolver = Arc::new(IdentityResolver::new(verifier));

    // ── Step 3: Services ─────────────────────────────────────────
    tracing::info!(files_url = %config.services.files_base(), "Initializing services...");
    let attacher: Arc<dyn FileAttacher> = Arc::new(HttpFileAttacher::new(&config.services)?);
    let catalog_service = Arc::new(SagaCoordinator::new(
        Arc::clone(&catalog_store),
        attacher,
    ));
    let notification_service = Arc::new(NotificationService::new(Arc::clone(
        &notification_store,
    )));

    // ── Step 4: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 5: Queue consumer ───────────────────────────────────
    let consumer_handle = if config.queue.enabled {
        let ingestor = Arc::new(NotificationIngestor::new(
            Arc::clone(&notification_store),
            config.queue.deduplicate,
        ));
        let consumer = QueueConsumer::connect(config.queue.clone(), ingestor).await?;

        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = consumer.run(cancel).await {
                tracing::error!(error = %e, "Queue consumer stopped");
            }
        }))
    } else {
        tracing::info!("Queue consumer disabled");
        None
    };

    // ── Step 6: HTTP server ──────────────────────────────────────
    let app_state = AppState {
        config: Arc::clone(&config),
        identity_resolver,
        catalog_service,
        notification_service,
    };

    let app = projecthub_api::build_app(app_state, &config.server.cors);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ProjectHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Drain background tasks ───────────────────────────
    if let Some(handle) = consumer_handle {
        tracing::info!("Waiting for queue consumer to drain...");
        let grace = Duration::from_secs(config.queue.shutdown_grace_seconds + 5);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Queue consumer did not stop in time");
        }
    }

    if let Some(db_pool) = db_pool {
        db_pool.close().await;
    }

    tracing::info!("ProjectHub server shut down gracefully");
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
