use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single spending record as consumed by the forecaster and the alert checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(amount: Decimal, category: &str, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.to_string(),
            date,
        }
    }
}
