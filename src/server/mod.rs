mod handlers;
mod routes;

use crate::config::{AlertPolicy, ForecastPolicy};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub forecast_policy: Arc<ForecastPolicy>,
    pub alert_policy: Arc<AlertPolicy>,
}

impl AppState {
    pub fn new(forecast_policy: ForecastPolicy, alert_policy: AlertPolicy) -> Self {
        Self {
            forecast_policy: Arc::new(forecast_policy),
            alert_policy: Arc::new(alert_policy),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(routes::api_routes())
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
