use axum::{routing::post, Router};
use crate::server::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict-spending", post(handlers::predict_spending))
        .route("/alerts/check", post(handlers::check_alerts))
}
