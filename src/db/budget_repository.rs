use crate::error::{AppError, Result};
use crate::models::budget::CategoryBudget;
use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn set_budget(conn: &Connection, category: &str, amount: &Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO category_budgets (category, amount) VALUES (?1, ?2)
         ON CONFLICT(category) DO UPDATE SET amount = excluded.amount",
        rusqlite::params![category, amount.to_string()],
    )?;
    Ok(())
}

pub fn get_budget(conn: &Connection, category: &str) -> Result<Option<CategoryBudget>> {
    let budget = conn
        .query_row(
            "SELECT id, category, amount FROM category_budgets WHERE LOWER(category) = LOWER(?1)",
            [category],
            budget_from_row,
        )
        .optional()?;
    Ok(budget)
}

pub fn get_all_budgets(conn: &Connection) -> Result<Vec<CategoryBudget>> {
    let mut stmt = conn.prepare("SELECT id, category, amount FROM category_budgets ORDER BY category ASC")?;
    let iter = stmt.query_map([], budget_from_row)?;

    let mut budgets = Vec::new();
    for budget in iter {
        budgets.push(budget?);
    }
    Ok(budgets)
}

pub fn delete_budget(conn: &Connection, category: &str) -> Result<()> {
    let rows = conn.execute("DELETE FROM category_budgets WHERE LOWER(category) = LOWER(?1)", [category])?;

    if rows == 0 {
        return Err(AppError::NotFound(format!("Budget for category '{}'", category)));
    }
    Ok(())
}

fn budget_from_row(row: &Row) -> rusqlite::Result<CategoryBudget> {
    let amount_str: String = row.get(2)?;
    let amount = Decimal::from_str(&amount_str)
        .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?;
    Ok(CategoryBudget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_set_budget_upserts() {
        let conn = establish_test_connection().unwrap();
        set_budget(&conn, "food", &Decimal::from(100)).unwrap();
        set_budget(&conn, "food", &Decimal::from(250)).unwrap();

        let budgets = get_all_budgets(&conn).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, Decimal::from(250));
    }

    #[test]
    fn test_get_budget_case_insensitive() {
        let conn = establish_test_connection().unwrap();
        set_budget(&conn, "Food", &Decimal::from(100)).unwrap();

        let budget = get_budget(&conn, "FOOD").unwrap().unwrap();
        assert_eq!(budget.category, "Food");
        assert!(get_budget(&conn, "rent").unwrap().is_none());
    }

    #[test]
    fn test_get_all_budgets_sorted_by_category() {
        let conn = establish_test_connection().unwrap();
        set_budget(&conn, "travel", &Decimal::from(1)).unwrap();
        set_budget(&conn, "food", &Decimal::from(2)).unwrap();

        let names: Vec<String> = get_all_budgets(&conn).unwrap().into_iter().map(|b| b.category).collect();
        assert_eq!(names, vec!["food", "travel"]);
    }
}
