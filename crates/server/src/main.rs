//! Dzretour server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use dzretour_api::{AppState, RateLimitPolicy, RateLimiter, router as api_router};
use dzretour_common::{Config, IdGenerator, PhoneHasher};
use dzretour_core::{CheckService, GeoLocator, ReportService};
use dzretour_db::repositories::{ReportRepository, ReportStatsRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between rate limiter sweeps.
const LIMITER_SWEEP_SECS: u64 = 300;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before config loads, ignore if absent
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dzretour=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting dzretour server...");

    // Load configuration
    let config = Config::load()?;
    info!(environment = %config.server.environment, "Configuration loaded");

    // Connect to database and run migrations
    let db = dzretour_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    dzretour_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let stats_repo = ReportStatsRepository::new(Arc::clone(&db));

    // Initialize services
    let hasher = PhoneHasher::new(config.security.phone_salt.clone());
    let geo_locator = GeoLocator::new(&config.geoip)?;
    let report_service = ReportService::new(
        report_repo.clone(),
        stats_repo,
        hasher.clone(),
        geo_locator,
        IdGenerator::new(),
    );
    let check_service = CheckService::new(report_repo, hasher);

    // Per-endpoint rate limiters
    let check_limiter = RateLimiter::new(RateLimitPolicy::new(
        config.rate_limit.check_max_requests,
        config.rate_limit.check_window_secs,
    ));
    let report_limiter = RateLimiter::new(RateLimitPolicy::new(
        config.rate_limit.report_max_requests,
        config.rate_limit.report_window_secs,
    ));

    // Periodic sweep so the window maps do not grow unbounded
    {
        let check_limiter = check_limiter.clone();
        let report_limiter = report_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(LIMITER_SWEEP_SECS));
            loop {
                interval.tick().await;
                check_limiter.sweep_expired().await;
                report_limiter.sweep_expired().await;
            }
        });
    }

    // Create app state
    let state = AppState {
        report_service,
        check_service,
        check_limiter,
        report_limiter,
        expose_score: !config.server.is_production(),
    };

    // Build router
    let app = Router::new()
        .merge(api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
