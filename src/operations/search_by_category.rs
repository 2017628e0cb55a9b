use crate::db::repository;
use crate::error::{AppError, Result};
use crate::models::transaction::Transaction;
use rusqlite::Connection;

pub fn search_transactions_by_category_db(conn: &Connection, category: &str) -> Result<Vec<Transaction>> {
    let category = category.trim();
    if category.is_empty() {
        return Err(AppError::invalid("Category cannot be empty"));
    }
    repository::search_by_category(conn, category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::models::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_test_transaction(id: &str, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 9).expect("Invalid date"),
            description: "Test Description".to_string(),
            amount: Decimal::new(10050, 2),
            transaction_type: TransactionType::Expense,
            category: category.to_string(),
        }
    }

    #[test]
    fn test_search_db_requires_category() {
        let conn = establish_test_connection().unwrap();
        let err = search_transactions_by_category_db(&conn, "  ").unwrap_err();
        assert_eq!(err.to_string(), "Category cannot be empty");
    }

    #[test]
    fn test_search_db_trims_input_and_ignores_case() {
        let conn = establish_test_connection().unwrap();
        repository::add_transaction(&conn, &create_test_transaction("1", "Food")).unwrap();
        repository::add_transaction(&conn, &create_test_transaction("2", "Travel")).unwrap();
        repository::add_transaction(&conn, &create_test_transaction("3", "food")).unwrap();

        let found = search_transactions_by_category_db(&conn, " FOOD ").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.category.eq_ignore_ascii_case("food")));
    }
}
