use crate::db::budget_repository;
use crate::error::{AppError, Result};
use crate::models::budget::CategoryBudget;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

fn parse_amount(amount_str: &str) -> Result<Decimal> {
    Decimal::from_str(amount_str.trim()).map_err(|_| {
        AppError::invalid(format!("Invalid budget amount '{}'. Must be a valid number", amount_str))
    })
}

fn normalize_category(category: &str) -> Result<String> {
    let category = category.trim();
    if category.is_empty() {
        return Err(AppError::invalid("Category cannot be empty"));
    }
    Ok(category.to_lowercase())
}

pub fn set_budget_db(conn: &Connection, category: &str, amount_str: &str) -> Result<()> {
    let amount = parse_amount(amount_str)?;
    let category = normalize_category(category)?;
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid("Budget must be positive"));
    }
    budget_repository::set_budget(conn, &category, &amount)?;
    info!(%category, %amount, "budget set");
    Ok(())
}

pub fn increase_budget_db(conn: &Connection, category: &str, amount_str: &str) -> Result<()> {
    let delta = parse_amount(amount_str)?;
    let category = normalize_category(category)?;
    let current = budget_repository::get_budget(conn, &category)?
        .map(|b| b.amount)
        .unwrap_or(Decimal::ZERO);
    let new_amount = current + delta;
    if new_amount <= Decimal::ZERO {
        return Err(AppError::invalid("Budget must be positive"));
    }
    budget_repository::set_budget(conn, &category, &new_amount)
}

pub fn decrease_budget_db(conn: &Connection, category: &str, amount_str: &str) -> Result<()> {
    let delta = parse_amount(amount_str)?;
    let category = normalize_category(category)?;
    let current = budget_repository::get_budget(conn, &category)?
        .map(|b| b.amount)
        .unwrap_or(Decimal::ZERO);
    let new_amount = current - delta;
    if new_amount < Decimal::ZERO {
        return Err(AppError::invalid("Budget cannot be negative"));
    }
    if new_amount.is_zero() {
        return Err(AppError::invalid("Budget must be positive"));
    }
    budget_repository::set_budget(conn, &category, &new_amount)
}

pub fn list_budgets_db(conn: &Connection) -> Result<Vec<CategoryBudget>> {
    budget_repository::get_all_budgets(conn)
}

pub fn delete_budget_db(conn: &Connection, category: &str) -> Result<()> {
    let category = normalize_category(category)?;
    budget_repository::delete_budget(conn, &category)
}
