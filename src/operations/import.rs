use super::add::create_transaction;
use crate::db::repository;
use crate::error::{AppError, Result};
use crate::models::transaction::Transaction;
use rusqlite::Connection;
use std::fs::File;
use std::path::Path;
use tracing::info;

const COLUMNS: usize = 5;

/// Imports a headerless `date,description,amount,type,category` CSV.
/// Nothing is written unless every line parses.
pub fn import_transactions_to_db(conn: &Connection, path: &Path) -> Result<usize> {
    let transactions = import_csv(path)?;

    let tx = conn.unchecked_transaction()?;
    for transaction in &transactions {
        repository::add_transaction(&tx, transaction)?;
    }
    tx.commit()?;

    info!(count = transactions.len(), path = %path.display(), "imported transactions");
    Ok(transactions.len())
}

fn import_csv(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path).map_err(|e| {
        AppError::invalid(format!("Failed to open file '{}': {}", path.display(), e))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut transactions = Vec::new();

    for (line_index, result) in reader.records().enumerate() {
        let line = line_index + 1;
        let record = result?;

        if record.len() != COLUMNS {
            return Err(AppError::invalid(format!(
                "Invalid number of columns on line {}: expected {}, got {}",
                line,
                COLUMNS,
                record.len()
            )));
        }

        let raw_input = record.iter().collect::<Vec<_>>().join(",");
        let transaction = create_transaction(&raw_input)
            .map_err(|e| AppError::invalid(format!("Line {}: {}", line, e)))?;

        transactions.push(transaction);
    }

    Ok(transactions)
}
