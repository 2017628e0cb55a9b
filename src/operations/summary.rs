use crate::db::repository;
use crate::error::{AppError, Result};
use crate::models::transaction::Transaction;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_PERIOD_DAYS: i64 = 30;
pub const DEFAULT_TREND_MONTHS: u32 = 6;
const MAX_TREND_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub categories: Vec<CategoryShare>,
}

/// Expense totals between two dates, inclusive. Missing bounds default to the
/// last 30 days ending `today`.
pub fn summarize_db(
    conn: &Connection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<SpendingSummary> {
    let end_date = end.unwrap_or(today);
    let start_date = start.unwrap_or(end_date - Duration::days(DEFAULT_PERIOD_DAYS));
    if start_date > end_date {
        return Err(AppError::invalid("Start date must be before end date."));
    }

    let transactions = repository::get_expense_transactions_in_range(conn, start_date, end_date)?;
    Ok(build_summary(&transactions, start_date, end_date))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: Decimal,
    pub count: usize,
}

/// Expense totals per calendar month over roughly the last `months` months
/// (30 days each), oldest month first.
pub fn monthly_trends_db(conn: &Connection, months: u32, today: NaiveDate) -> Result<Vec<MonthlyTotal>> {
    if months == 0 || months > MAX_TREND_MONTHS {
        return Err(AppError::invalid(format!(
            "Months must be between 1 and {}.",
            MAX_TREND_MONTHS
        )));
    }

    let start_date = today - Duration::days(i64::from(months) * DEFAULT_PERIOD_DAYS);
    let transactions = repository::get_expense_transactions_in_range(conn, start_date, today)?;
    Ok(monthly_totals(&transactions))
}

pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    for transaction in transactions {
        let entry = by_month
            .entry(transaction.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(transaction.amount.abs());
        entry.1 += 1;
    }

    by_month
        .into_iter()
        .map(|(month, (total, count))| MonthlyTotal { month, total, count })
        .collect()
}

pub fn build_summary(transactions: &[Transaction], start_date: NaiveDate, end_date: NaiveDate) -> SpendingSummary {
    let mut by_category: HashMap<String, (Decimal, usize)> = HashMap::new();
    for transaction in transactions {
        let entry = by_category
            .entry(transaction.category.clone())
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(transaction.amount.abs());
        entry.1 += 1;
    }

    let total = by_category.values().fold(Decimal::ZERO, |acc, (v, _)| acc.saturating_add(*v));
    let count = transactions.len();

    let mut categories: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, (amount, n))| CategoryShare {
            percentage: percentage_of(amount, total),
            category,
            total: amount,
            count: n,
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    let average = if count == 0 {
        Decimal::ZERO
    } else {
        (total / Decimal::from(count)).round_dp(2)
    };

    SpendingSummary {
        start_date,
        end_date,
        total,
        count,
        average,
        categories,
    }
}

fn percentage_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED).round_dp(2)
}
