use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;
use rust_decimal::Decimal;
use crate::db::repository;
use crate::error::{AppError, Result};
use crate::models::transaction::{Transaction, TransactionType};

const MAX_DESCRIPTION_LEN: usize = 255;
const MAX_CATEGORY_LEN: usize = 50;

/// Parses `date, description, amount, type, category` into a new transaction.
pub fn create_transaction(details: &str) -> Result<Transaction> {
    let detail_parts: Vec<&str> = details.split(',').map(|s| s.trim()).collect();
    if detail_parts.len() != 5 {
        return Err(AppError::invalid(format!(
            "Invalid number of details provided. Expected 5 details separated by commas but got {}",
            detail_parts.len()
        )));
    }

    let date = NaiveDate::parse_from_str(detail_parts[0], "%Y-%m-%d")
        .map_err(|_| AppError::invalid("Invalid date format. Please use YYYY-MM-DD."))?;

    let amount = detail_parts[2].parse::<Decimal>().map_err(|_| {
        AppError::invalid(format!(
            "Invalid amount format {}. Please provide a valid decimal number.",
            detail_parts[2]
        ))
    })?;
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid("Amount must be positive"));
    }

    let transaction_type = TransactionType::parse(detail_parts[3])
        .ok_or_else(|| AppError::invalid("Invalid transaction type. Use 'income' or 'expense'."))?;

    let description = detail_parts[1].to_string();
    if description.is_empty() {
        return Err(AppError::invalid("Description cannot be empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::invalid("Description too long"));
    }

    let category = detail_parts[4].to_lowercase();
    if category.is_empty() {
        return Err(AppError::invalid("Category cannot be empty"));
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(AppError::invalid("Category too long"));
    }

    Ok(Transaction::new(
        Uuid::new_v4().to_string(),
        date,
        description,
        amount,
        transaction_type,
        category,
    ))
}

pub fn add_transaction_to_db(conn: &Connection, details: &str) -> Result<Transaction> {
    let transaction = create_transaction(details)?;
    repository::add_transaction(conn, &transaction)?;
    info!(id = %transaction.id, category = %transaction.category, "transaction added");
    Ok(transaction)
}
