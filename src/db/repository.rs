use crate::error::{AppError, Result};
use crate::models::expense::Expense;
use crate::models::transaction::{Transaction, TransactionType};
use rusqlite::{Connection, Params, Row};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

const SELECT_TRANSACTIONS: &str =
    "SELECT id, date, description, amount, transaction_type, category FROM transactions";

pub fn add_transaction(conn: &Connection, transaction: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions (id, date, description, amount, transaction_type, category) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            &transaction.id,
            transaction.date.to_string(),
            &transaction.description,
            transaction.amount.to_string(),
            transaction.transaction_type.as_str(),
            &transaction.category,
        ],
    )?;

    Ok(())
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    query_transactions(conn, &format!("{} ORDER BY date DESC", SELECT_TRANSACTIONS), [])
}

/// Expense rows oldest first, the order the forecaster expects.
pub fn get_expense_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!("{} WHERE transaction_type = 'expense' ORDER BY date ASC, rowid ASC", SELECT_TRANSACTIONS),
        [],
    )
}

/// Expense rows in forecaster form.
pub fn get_expenses(conn: &Connection) -> Result<Vec<Expense>> {
    Ok(get_expense_transactions(conn)?
        .iter()
        .filter_map(Transaction::to_expense)
        .collect())
}

pub fn update_transaction(conn: &Connection, transaction: &Transaction) -> Result<()> {
    let rows_affected = conn.execute(
        "UPDATE transactions SET date = ?2, description = ?3, amount = ?4, transaction_type = ?5, category = ?6 WHERE id = ?1",
        rusqlite::params![
            &transaction.id,
            transaction.date.to_string(),
            &transaction.description,
            transaction.amount.to_string(),
            transaction.transaction_type.as_str(),
            &transaction.category,
        ],
    )?;

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("Transaction with ID {}", transaction.id)));
    }

    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: &str) -> Result<()> {
    let rows_affected = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("Transaction with ID {}", id)));
    }

    Ok(())
}

pub fn search_by_category(conn: &Connection, category: &str) -> Result<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!("{} WHERE LOWER(category) = LOWER(?1) ORDER BY date DESC", SELECT_TRANSACTIONS),
        [category],
    )
}

pub fn get_expense_transactions_in_range(
    conn: &Connection,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<Transaction>> {
    query_transactions(
        conn,
        &format!(
            "{} WHERE transaction_type = 'expense' AND date >= ?1 AND date <= ?2 ORDER BY date ASC",
            SELECT_TRANSACTIONS
        ),
        [start_date.to_string(), end_date.to_string()],
    )
}

fn query_transactions<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let transaction_iter = stmt.query_map(params, transaction_from_row)?;

    let mut transactions = Vec::new();
    for transaction in transaction_iter {
        transactions.push(transaction?);
    }

    Ok(transactions)
}

fn transaction_from_row(row: &Row) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    let amount_str: String = row.get(3)?;
    let transaction_type_str: String = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
        description: row.get(2)?,
        amount: Decimal::from_str(&amount_str)
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
        transaction_type: TransactionType::parse(&transaction_type_str)
            .ok_or_else(|| rusqlite::Error::InvalidParameterName("Invalid transaction type".to_string()))?,
        category: row.get(5)?,
    })
}
