use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;
use crate::db::repository;
use crate::error::{AppError, Result};

pub(crate) fn parse_transaction_id(id_input: &str) -> Result<Uuid> {
    let id_input = id_input.trim();
    if id_input.is_empty() {
        return Err(AppError::invalid("Transaction ID cannot be empty."));
    }

    Uuid::parse_str(id_input)
        .map_err(|_| AppError::invalid("Invalid transaction ID format. Please provide a valid UUID."))
}

pub fn remove_transaction_from_db(conn: &Connection, id_input: &str) -> Result<()> {
    let id = parse_transaction_id(id_input)?;
    repository::remove_transaction(conn, &id.to_string())?;
    info!(%id, "transaction removed");
    Ok(())
}
