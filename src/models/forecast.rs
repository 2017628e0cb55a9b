use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingForecast {
    pub total_prediction: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
    pub trend: Decimal,
    pub confidence: u8,
    pub days_ahead: u32,
}

/// A row in the `spending_predictions` table.
#[derive(Debug, Clone)]
pub struct StoredPrediction {
    pub id: i64,
    pub category: String,
    pub predicted_amount: Decimal,
    /// 0.0 to 1.0
    pub confidence_score: f64,
    pub model_version: String,
    pub month: String,
    pub created_at: String,
}
