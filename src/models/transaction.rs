use rust_decimal::Decimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::expense::Expense;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

/// A stored ledger row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category: String,
}

impl Transaction {
    pub fn new(id: String, date: NaiveDate, description: String, amount: Decimal, transaction_type: TransactionType, category: String) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            transaction_type,
            category,
        }
    }

    /// Income rows have no place in spending analysis.
    pub fn to_expense(&self) -> Option<Expense> {
        match self.transaction_type {
            TransactionType::Expense => Some(Expense {
                amount: self.amount.abs(),
                category: self.category.clone(),
                date: self.date,
            }),
            TransactionType::Income => None,
        }
    }
}
