use axum::{extract::State, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::alert::AlertReport;
use crate::models::expense::Expense;
use crate::models::forecast::SpendingForecast;
use crate::operations::{alerts, forecast};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub expenses: Vec<Expense>,
    pub days_ahead: Option<u32>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsRequest {
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub budgets: HashMap<String, Decimal>,
    pub user_settings: Option<Value>,
}

pub async fn predict_spending(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> Json<SpendingForecast> {
    let days_ahead = match payload.days_ahead {
        Some(0) => {
            warn!("daysAhead must be positive, using the default horizon");
            state.forecast_policy.default_days_ahead
        }
        Some(days) => days,
        None => state.forecast_policy.default_days_ahead,
    };

    let result = forecast::forecast_spending(
        &payload.expenses,
        days_ahead,
        payload.category.as_deref(),
        &state.forecast_policy,
    );
    info!(
        expenses = payload.expenses.len(),
        days_ahead,
        confidence = result.confidence,
        "predict-spending"
    );
    Json(result)
}

pub async fn check_alerts(
    State(state): State<AppState>,
    Json(payload): Json<AlertsRequest>,
) -> Json<AlertReport> {
    let monthly_budget = payload
        .user_settings
        .as_ref()
        .and_then(monthly_budget_override)
        .unwrap_or(state.alert_policy.default_monthly_budget);

    let report = alerts::check_budget_alerts(
        &payload.expenses,
        &payload.budgets,
        monthly_budget,
        &state.alert_policy,
        Utc::now().date_naive(),
    );
    info!(
        expenses = payload.expenses.len(),
        alerts = report.total_alerts,
        critical = report.critical_count,
        "alerts/check"
    );
    Json(report)
}

/// `userSettings` is otherwise opaque; only a positive `monthlyBudget` is honoured.
fn monthly_budget_override(settings: &Value) -> Option<Decimal> {
    let raw = settings.get("monthlyBudget")?;
    serde_json::from_value::<Decimal>(raw.clone())
        .ok()
        .filter(|budget| *budget > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlertPolicy, ForecastPolicy};
    use crate::server::app;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(ForecastPolicy::default(), AlertPolicy::default())
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app(state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn this_month(day: u32) -> String {
        let today = Utc::now().date_naive();
        format!("{}-{:02}", today.format("%Y-%m"), day)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_predict_single_expense() {
        let (status, body) = post(
            "/predict-spending",
            json!({
                "expenses": [{"amount": 100, "category": "food", "date": "2025-01-01"}],
                "daysAhead": 7
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPrediction"].as_f64(), Some(100.0));
        assert_eq!(body["byCategory"]["food"].as_f64(), Some(100.0));
        assert_eq!(body["trend"].as_f64(), Some(1.0));
        assert_eq!(body["confidence"], 46);
        assert_eq!(body["daysAhead"], 7);
    }

    #[tokio::test]
    async fn test_predict_empty_uses_default_horizon() {
        let (status, body) = post("/predict-spending", json!({"expenses": []})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalPrediction"].as_f64(), Some(0.0));
        assert_eq!(body["byCategory"], json!({}));
        assert_eq!(body["confidence"], 0);
        assert_eq!(body["daysAhead"], 30);
    }

    #[tokio::test]
    async fn test_predict_extreme_amounts_still_answer() {
        let (status, body) = post(
            "/predict-spending",
            json!({
                "expenses": [
                    {"amount": 0.0001, "category": "food", "date": "2025-01-01"},
                    {"amount": 10000000000000.0, "category": "food", "date": "2025-01-02"}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["totalPrediction"].as_f64().unwrap() > 1e28);
        assert_eq!(body["confidence"], 52);
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_body() {
        let (status, _) = post("/predict-spending", json!({"expenses": [{"amount": 5}]})).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_alerts_food_scenario() {
        let expenses = json!([
            {"amount": 50, "category": "food", "date": this_month(1)},
            {"amount": 500, "category": "food", "date": this_month(2)}
        ]);

        let (status, body) = post(
            "/alerts/check",
            json!({"expenses": expenses.clone(), "budgets": {"food": 300}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalAlerts"], 1);
        assert_eq!(body["criticalCount"], 1);
        assert_eq!(body["warningCount"], 0);
        let alert = &body["alerts"][0];
        assert_eq!(alert["type"], "category_limit");
        assert_eq!(alert["severity"], "critical");
        assert_eq!(alert["category"], "food");
        assert_eq!(alert["currentSpending"].as_f64(), Some(550.0));
        assert_eq!(alert["limit"].as_f64(), Some(300.0));

        let (_, body) = post(
            "/alerts/check",
            json!({
                "expenses": expenses,
                "budgets": {"food": 300},
                "userSettings": {"monthlyBudget": 100, "theme": "dark"}
            }),
        )
        .await;
        assert_eq!(body["totalAlerts"], 2);
        assert_eq!(body["alerts"][1]["type"], "total_limit");
        assert!(body["alerts"][1].get("category").is_none());
    }

    #[test]
    fn test_monthly_budget_override_ignores_junk() {
        assert_eq!(monthly_budget_override(&json!({"monthlyBudget": 250.5})), Some(Decimal::new(2505, 1)));
        assert_eq!(monthly_budget_override(&json!({"monthlyBudget": -1})), None);
        assert_eq!(monthly_budget_override(&json!({"monthlyBudget": "lots"})), None);
        assert_eq!(monthly_budget_override(&json!("opaque")), None);
    }
}
