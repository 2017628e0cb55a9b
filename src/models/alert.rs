use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CategoryLimit,
    TotalLimit,
    Anomaly,
}

impl AlertKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::CategoryLimit => "category_limit",
            AlertKind::TotalLimit => "total_limit",
            AlertKind::Anomaly => "anomaly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub current_spending: Decimal,
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub alerts: Vec<Alert>,
    pub total_alerts: usize,
    pub critical_count: usize,
    pub warning_count: usize,
}

impl AlertReport {
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();
        let critical_count = count(Severity::Critical);
        let warning_count = count(Severity::Warning);
        Self {
            total_alerts: alerts.len(),
            critical_count,
            warning_count,
            alerts,
        }
    }
}

/// An alert row in the `budget_alerts` table.
#[derive(Debug, Clone)]
pub struct BudgetAlert {
    pub id: i64,
    pub kind: String,
    pub severity: String,
    pub category: Option<String>,
    pub message: String,
    pub current_spending: Decimal,
    pub limit: Decimal,
    pub created_at: String,
}
