use rusqlite::{Connection, Result};
use tracing::info;

pub fn establish_connection(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    info!(database = path, "opened database");
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount TEXT NOT NULL,
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense')),
            category TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS category_budgets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL UNIQUE,
            amount TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS budget_alerts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            severity TEXT NOT NULL,
            category TEXT,
            message TEXT NOT NULL,
            current_spending TEXT NOT NULL,
            limit_amount TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS spending_predictions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            predicted_amount TEXT NOT NULL,
            confidence_score REAL NOT NULL,
            model_version TEXT NOT NULL,
            month TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_schema_is_idempotent() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        establish_connection(path).unwrap();
        let conn = establish_connection(path).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
                 ('transactions', 'category_budgets', 'budget_alerts', 'spending_predictions')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }
}
