//! HTTP surface: JSON API, static assets, and the dashboard page.

pub mod routes;
pub mod state;

pub use state::AppState;

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::services::{ServeDir, ServeFile};

/// Build the application router over `state`.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/api/crops", get(routes::crops))
        .route("/api/crop-data/{crop_name}", get(routes::crop_data))
        .route("/api/statistics", get(routes::statistics))
        .route("/api/crop-chart-data/{crop_name}", get(routes::crop_chart_data))
        .route("/api/crop-chart-svg/{crop_name}", get(routes::crop_chart_svg))
        .route("/api/states", get(routes::states))
        .route("/api/legend/{crop_name}", get(routes::legend))
        .route("/api/choropleth/{crop_name}", get(routes::choropleth))
        .route("/api/boundaries", get(routes::boundaries))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .nest_service("/data", ServeDir::new(&config.data_dir))
        .route_service("/", ServeFile::new(&config.index_file))
        .with_state(state)
}

/// Load data per `config` and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<()> {
    let addr = config.addr()?;
    let state = AppState::load(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;
    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
