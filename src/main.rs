//! TrekBook Server — trek booking backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use trekbook_core::config::AppConfig;
use trekbook_core::error::AppError;
use trekbook_core::traits::{NotificationSink, PriceLookup};
use trekbook_database::store::{PgReservationStore, ReservationStore};
use trekbook_database::DatabasePool;

#[tokio::main]
async fn main() {
    let env = std::env::var("TREKBOOK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
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
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TrekBook v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    trekbook_database::migration::run_migrations(db.pool()).await?;

    // ── Repositories ─────────────────────────────────────────────
    let pool = db.pool().clone();
    let slot_repo = Arc::new(trekbook_database::repositories::SlotRepository::new(
        pool.clone(),
    ));
    let booking_repo = Arc::new(trekbook_database::repositories::BookingRepository::new(
        pool.clone(),
    ));
    let voucher_repo = Arc::new(trekbook_database::repositories::VoucherRepository::new(
        pool.clone(),
    ));
    let trek_repo = Arc::new(trekbook_database::repositories::TrekRepository::new(
        pool.clone(),
    ));
    let job_repo = Arc::new(trekbook_database::repositories::JobRepository::new(
        pool.clone(),
    ));

    // ── Reservation store & collaborators ────────────────────────
    let store: Arc<dyn ReservationStore> = Arc::new(PgReservationStore::new(pool.clone()));
    let prices: Arc<dyn PriceLookup> = trek_repo.clone();
    let sink: Arc<dyn NotificationSink> = Arc::new(trekbook_service::TracingSink::new());

    // ── Services ─────────────────────────────────────────────────
    let voucher_resolver = Arc::new(trekbook_service::voucher::VoucherResolver::new(
        store.clone(),
    ));
    let engine = Arc::new(trekbook_service::booking::ReservationEngine::new(
        store.clone(),
        prices,
        voucher_resolver.clone(),
        sink.clone(),
    ));
    let booking_admin = Arc::new(trekbook_service::booking::BookingAdminService::new(
        store.clone(),
        sink.clone(),
    ));
    let booking_queries = Arc::new(trekbook_service::booking::BookingQueryService::new(
        booking_repo.clone(),
    ));
    let slot_service = Arc::new(trekbook_service::slot::SlotService::new(
        slot_repo.clone(),
        trek_repo.clone(),
        store.clone(),
        sink.clone(),
    ));
    let voucher_admin = Arc::new(trekbook_service::voucher::VoucherAdminService::new(
        voucher_repo.clone(),
    ));
    tracing::info!("Services initialized");

    // ── Shutdown channel ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Background worker ────────────────────────────────────────
    let worker_handle = if config.worker.enabled {
        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);

        let queue = Arc::new(trekbook_worker::queue::JobQueue::new(
            job_repo.clone(),
            worker_id.clone(),
        ));

        let mut executor = trekbook_worker::executor::JobExecutor::new();
        executor.register(Arc::new(
            trekbook_worker::jobs::SlotReconcileHandler::new(slot_repo.clone(), store.clone()),
        ));
        executor.register(Arc::new(trekbook_worker::jobs::SlotArchiveHandler::new(
            slot_repo.clone(),
        )));
        executor.register(Arc::new(
            trekbook_worker::jobs::ParticipantRepairHandler::new(booking_repo.clone()),
        ));
        executor.register(Arc::new(trekbook_worker::jobs::JobCleanupHandler::new(
            job_repo.clone(),
        )));

        let runner = trekbook_worker::WorkerRunner::new(
            queue.clone(),
            Arc::new(executor),
            config.worker.clone(),
            worker_id,
        );

        let scheduler = trekbook_worker::CronScheduler::new(queue).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = trekbook_api::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        engine,
        booking_admin,
        booking_queries,
        slots: slot_service,
        voucher_resolver,
        voucher_admin,
    };

    let app = trekbook_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TrekBook server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Wait for background tasks ────────────────────────────────
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    db.close().await;
    tracing::info!("TrekBook server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
