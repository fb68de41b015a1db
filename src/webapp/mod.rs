//! Web dashboard
//!
//! Serves the interactive page and the JSON/PNG endpoints it draws from.
//! Every request computes its own surface; the only shared state is the
//! immutable configuration.

pub mod figure;
pub mod page;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::utils::PricingSurfaceCalculator;

pub use figure::{figure_json, surface_to_plot};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub calculator: PricingSurfaceCalculator,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let calculator = PricingSurfaceCalculator::new(config.grid);
        Self {
            config,
            calculator,
            start_time: std::time::Instant::now(),
        }
    }
}

pub fn build_router(config: Arc<Config>) -> Router {
    let state = AppState::new(config);

    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the first usable address the configured host resolves to
pub async fn bind(config: &Config) -> Result<TcpListener> {
    let addrs = config.socket_addrs()?;
    Ok(TcpListener::bind(addrs.as_slice()).await?)
}

/// Bind the configured address and serve until the process exits
pub async fn serve(config: Config) -> Result<()> {
    let listener = bind(&config).await?;
    serve_with_listener(config, listener).await
}

pub async fn serve_with_listener(config: Config, listener: TcpListener) -> Result<()> {
    let addr = listener.local_addr()?;
    let grid = config.grid;
    let router = build_router(Arc::new(config));

    info!(
        "Dashboard listening on http://{} (grid {}x{}, prices {}..{})",
        addr, grid.price_steps, grid.max_time_steps, grid.min_price, grid.max_price
    );

    axum::serve(listener, router).await?;
    Ok(())
}
