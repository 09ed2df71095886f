use std::sync::Arc;

use axum::{routing::get, Router};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::broadcast::{spawn_broadcast_loop, SubscriberHub};
use crate::catalog::{now_epoch, Catalog};
use crate::demo;
use crate::fetch::{FetchError, FetchSource, N2yoClient};
use crate::scheduler::{
    spawn_refresh_loop, spawn_sweep_loop, LastError, RefreshConfig, SweepConfig, WorkerHandle,
};

use super::api_doc::ApiDoc;
use super::config::Config;
use super::{handlers, ws};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upstream client error: {0}")]
    Client(#[from] FetchError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub hub: Arc<SubscriberHub>,
    pub last_error: LastError,
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();
    let catalog = Arc::new(Catalog::new());
    let hub = Arc::new(SubscriberHub::new());
    let last_error = LastError::default();

    let mut workers: Vec<WorkerHandle> = Vec::new();

    // Broadcasting starts immediately so connected clients get a snapshot
    // (possibly empty) without waiting for the first fetch pass.
    workers.push(spawn_broadcast_loop(
        catalog.clone(),
        hub.clone(),
        config.screening.threshold_km,
        config.poll.broadcast_interval,
    ));

    if config.demo {
        log::info!("demo mode: simulated satellites, no external API");
        demo::ensure_catalog(&catalog, now_epoch());
        workers.push(demo::spawn_demo_loop(catalog.clone(), demo::STEP_INTERVAL));
    } else if let Some(api_key) = config.upstream.api_key() {
        let source: Arc<dyn FetchSource> = Arc::new(N2yoClient::new(
            api_key,
            config.upstream.base_url.clone(),
            config.upstream.timeout,
        )?);
        workers.push(spawn_sweep_loop(
            source.clone(),
            catalog.clone(),
            SweepConfig {
                regions: config.upstream.regions.clone(),
                radius_km: config.upstream.radius_km,
                interval: config.poll.sweep_interval,
                max_parallel: config.poll.sweep_parallel,
                group_pause: config.poll.sweep_pause,
                leo_max_alt_km: config.screening.leo_max_alt_km,
            },
            last_error.clone(),
        ));
        workers.push(spawn_refresh_loop(
            source,
            catalog.clone(),
            RefreshConfig {
                interval: config.poll.refresh_interval,
                max_parallel: config.poll.refresh_parallel,
                group_pause: config.poll.refresh_pause,
                window_seconds: config.poll.position_window,
            },
            last_error.clone(),
        ));
    } else {
        log::warn!(
            "no upstream api key configured and demo mode disabled; \
             the catalog stays empty until /api/snapshot falls back to simulation"
        );
    }

    let frontend = config.web.frontend.clone();
    let state = AppState {
        config: Arc::new(config),
        catalog,
        hub,
        last_error,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/snapshot", get(handlers::snapshot))
        .route("/ws/stream", get(ws::stream));

    if let Some(dir) = frontend {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    let app = app
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("shutting down background workers");
    for worker in workers {
        worker.stop().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
    }
}
