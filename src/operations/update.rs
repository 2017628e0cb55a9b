use rusqlite::Connection;
use tracing::info;
use crate::db::repository;
use crate::error::Result;
use crate::models::transaction::Transaction;
use super::add::create_transaction;
use super::remove::parse_transaction_id;

/// Replaces every field of an existing transaction, keeping its ID.
/// `details` uses the same `date, description, amount, type, category` form as `add`.
pub fn update_transaction_in_db(conn: &Connection, id_input: &str, details: &str) -> Result<Transaction> {
    let id = parse_transaction_id(id_input)?;
    let mut transaction = create_transaction(details)?;
    transaction.id = id.to_string();

    repository::update_transaction(conn, &transaction)?;
    info!(%id, category = %transaction.category, "transaction updated");
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::error::AppError;
    use crate::models::transaction::TransactionType;
    use crate::operations::add::add_transaction_to_db;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn test_update_keeps_id_and_replaces_details() {
        let conn = establish_test_connection().unwrap();
        let added = add_transaction_to_db(&conn, "2025-01-02, Bus, 2.40, expense, Transport").unwrap();

        let updated = update_transaction_in_db(&conn, &added.id, "2025-01-03, Train, 7.10, expense, Travel").unwrap();
        assert_eq!(updated.id, added.id);

        let stored = repository::get_all_transactions(&conn).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "Train");
        assert_eq!(stored[0].amount, Decimal::new(710, 2));
        assert_eq!(stored[0].category, "travel");
        assert_eq!(stored[0].transaction_type, TransactionType::Expense);
    }

    #[test]
    fn test_update_rejects_bad_input() {
        let conn = establish_test_connection().unwrap();
        let added = add_transaction_to_db(&conn, "2025-01-02, Bus, 2.40, expense, Transport").unwrap();

        let bad_details = update_transaction_in_db(&conn, &added.id, "2025-01-03, Train, -1, expense, Travel");
        assert_eq!(bad_details.unwrap_err().to_string(), "Amount must be positive");

        let missing = update_transaction_in_db(&conn, &Uuid::new_v4().to_string(), "2025-01-03, Train, 7, expense, Travel");
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let stored = repository::get_all_transactions(&conn).unwrap();
        assert_eq!(stored[0].description, "Bus");
    }
}
