use crate::error::Result;
use crate::models::alert::{Alert, BudgetAlert};
use chrono::Utc;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn add_alert(conn: &Connection, alert: &Alert) -> Result<()> {
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO budget_alerts (kind, severity, category, message, current_spending, limit_amount, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            alert.kind.as_str(),
            alert.severity.as_str(),
            alert.category,
            alert.message,
            alert.current_spending.to_string(),
            alert.limit.to_string(),
            created_at,
        ],
    )?;
    Ok(())
}

/// Stores a batch of alerts in one transaction.
pub fn add_alerts(conn: &Connection, alerts: &[Alert]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    for alert in alerts {
        add_alert(&tx, alert)?;
    }
    tx.commit()?;
    Ok(alerts.len())
}

pub fn get_all_alerts(conn: &Connection) -> Result<Vec<BudgetAlert>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, severity, category, message, current_spending, limit_amount, created_at
         FROM budget_alerts ORDER BY id DESC",
    )?;

    let iter = stmt.query_map([], |row| {
        let current_spending: String = row.get(5)?;
        let limit: String = row.get(6)?;
        Ok(BudgetAlert {
            id: row.get(0)?,
            kind: row.get(1)?,
            severity: row.get(2)?,
            category: row.get(3)?,
            message: row.get(4)?,
            current_spending: Decimal::from_str(&current_spending)
                .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
            limit: Decimal::from_str(&limit)
                .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
            created_at: row.get(7)?,
        })
    })?;

    let mut alerts = Vec::new();
    for alert in iter {
        alerts.push(alert?);
    }
    Ok(alerts)
}
