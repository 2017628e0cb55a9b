use crate::error::{AppError, Result};
use crate::models::forecast::{SpendingForecast, StoredPrediction};
use chrono::Utc;
use rusqlite::{Connection, Params};
use rust_decimal::Decimal;
use std::str::FromStr;

pub const MODEL_VERSION: &str = "moving-average-v1";
pub const TOTAL_CATEGORY: &str = "total";

const SELECT_PREDICTIONS: &str = "SELECT id, category, predicted_amount, confidence_score, model_version, month, created_at
     FROM spending_predictions";

/// Stores one row per category plus a `total` row, all or nothing.
/// Returns the number of rows written.
pub fn save_forecast(conn: &Connection, forecast: &SpendingForecast, month: &str) -> Result<usize> {
    let created_at = Utc::now().to_rfc3339();
    let confidence_score = f64::from(forecast.confidence) / 100.0;

    let rows = std::iter::once((TOTAL_CATEGORY, &forecast.total_prediction))
        .chain(forecast.by_category.iter().map(|(c, v)| (c.as_str(), v)));

    let tx = conn.unchecked_transaction()?;
    let mut written = 0;
    for (category, amount) in rows {
        tx.execute(
            "INSERT INTO spending_predictions (category, predicted_amount, confidence_score, model_version, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                category,
                amount.to_string(),
                confidence_score,
                MODEL_VERSION,
                month,
                created_at,
            ],
        )?;
        written += 1;
    }
    tx.commit()?;
    Ok(written)
}

pub fn get_predictions(conn: &Connection) -> Result<Vec<StoredPrediction>> {
    query_predictions(conn, &format!("{} ORDER BY id DESC", SELECT_PREDICTIONS), [])
}

pub fn get_predictions_by_month(conn: &Connection, month: &str) -> Result<Vec<StoredPrediction>> {
    query_predictions(
        conn,
        &format!("{} WHERE month = ?1 ORDER BY id DESC", SELECT_PREDICTIONS),
        [month],
    )
}

pub fn delete_prediction(conn: &Connection, id: i64) -> Result<()> {
    let rows = conn.execute("DELETE FROM spending_predictions WHERE id = ?1", [id])?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("Prediction {}", id)));
    }
    Ok(())
}

fn query_predictions<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<StoredPrediction>> {
    let mut stmt = conn.prepare(sql)?;
    let iter = stmt.query_map(params, |row| {
        let amount: String = row.get(2)?;
        Ok(StoredPrediction {
            id: row.get(0)?,
            category: row.get(1)?,
            predicted_amount: Decimal::from_str(&amount)
                .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
            confidence_score: row.get(3)?,
            model_version: row.get(4)?,
            month: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    let mut predictions = Vec::new();
    for prediction in iter {
        predictions.push(prediction?);
    }
    Ok(predictions)
}
