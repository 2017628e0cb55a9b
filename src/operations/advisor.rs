//! Rule-based financial advisor.
//!
//! Routes a free-text question to a topic by keyword and answers it from a
//! snapshot of the user's ledger and budgets.

use crate::db::{budget_repository, repository};
use crate::error::Result;
use crate::models::budget::CategoryBudget;
use crate::models::expense::Expense;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

const MAX_SUGGESTIONS: usize = 3;
const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Decimal {
        self.limit.saturating_sub(self.spent)
    }

    pub fn percentage_used(&self) -> Decimal {
        percentage(self.spent, self.limit)
    }
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .unwrap_or(Decimal::MAX)
        .saturating_mul(Decimal::ONE_HUNDRED)
}

fn total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialSnapshot {
    pub total_expenses: Decimal,
    pub expenses_count: usize,
    pub spent_this_month: Decimal,
    pub total_budget: Decimal,
    /// Largest first.
    pub category_totals: Vec<(String, Decimal)>,
    pub budget_status: Vec<BudgetStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub response: String,
    pub suggestions: Vec<String>,
}

/// Loads the ledger and budgets and builds a snapshot as of `today`.
pub fn snapshot_db(conn: &Connection, today: NaiveDate) -> Result<FinancialSnapshot> {
    let expenses = repository::get_expenses(conn)?;
    let budgets = budget_repository::get_all_budgets(conn)?;
    Ok(build_snapshot(&expenses, &budgets, today))
}

pub fn build_snapshot(expenses: &[Expense], budgets: &[CategoryBudget], today: NaiveDate) -> FinancialSnapshot {
    let in_month = |e: &&Expense| e.date.year() == today.year() && e.date.month() == today.month();

    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for expense in expenses {
        let spent = totals.entry(expense.category.as_str()).or_insert(Decimal::ZERO);
        *spent = spent.saturating_add(expense.amount);
    }
    let mut category_totals: Vec<(String, Decimal)> =
        totals.into_iter().map(|(c, v)| (c.to_string(), v)).collect();
    category_totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let budget_status = budgets
        .iter()
        .map(|budget| BudgetStatus {
            category: budget.category.clone(),
            limit: budget.amount,
            spent: total(
                expenses
                    .iter()
                    .filter(in_month)
                    .filter(|e| e.category.eq_ignore_ascii_case(&budget.category))
                    .map(|e| e.amount),
            ),
        })
        .collect();

    FinancialSnapshot {
        total_expenses: total(expenses.iter().map(|e| e.amount)),
        expenses_count: expenses.len(),
        spent_this_month: total(expenses.iter().filter(in_month).map(|e| e.amount)),
        total_budget: total(budgets.iter().map(|b| b.amount)),
        category_totals,
        budget_status,
    }
}

pub fn advise(message: &str, snapshot: &FinancialSnapshot) -> Advice {
    let message = message.to_lowercase();
    Advice {
        response: respond(&message, snapshot),
        suggestions: suggest(&message),
    }
}

fn mentions(message: &str, words: &[&str]) -> bool {
    words.iter().any(|w| message.contains(w))
}

fn respond(message: &str, s: &FinancialSnapshot) -> String {
    if mentions(message, &["budget", "save", "spending", "limit"]) {
        return budget_advice(s);
    }

    if mentions(message, &["category", "categories", "breakdown"]) {
        return match s.category_totals.first() {
            Some((top, amount)) => {
                let breakdown: Vec<String> = s
                    .category_totals
                    .iter()
                    .take(TOP_CATEGORIES)
                    .map(|(c, v)| format!("{}: {:.2}", c, v))
                    .collect();
                format!(
                    "Your top spending category is {} with {:.2}. Breakdown: {}. Consider setting a budget for each category.",
                    top,
                    amount,
                    breakdown.join(", ")
                )
            }
            None => "You haven't recorded many expenses yet. Start tracking them to see a category breakdown.".to_string(),
        };
    }

    if mentions(message, &["saving", "savings", "invest"]) {
        if s.total_budget > Decimal::ZERO && s.spent_this_month > Decimal::ZERO {
            let potential = s.total_budget.saturating_sub(s.spent_this_month);
            if potential > Decimal::ZERO {
                return format!(
                    "Based on your current spending you could save {:.2} this month. Automate transfers to savings and review unused subscriptions.",
                    potential
                );
            }
            return "You're currently over budget. Find your highest spending categories and cut back there first.".to_string();
        }
        return "To build savings: automate transfers, follow the 50/30/20 rule, and keep an emergency fund of 3 to 6 months of expenses.".to_string();
    }

    if mentions(message, &["expense", "expenses", "analysis"]) {
        if s.expenses_count == 0 {
            return "Start tracking your expenses to get a spending analysis.".to_string();
        }
        let average = s.total_expenses / Decimal::from(s.expenses_count);
        return format!(
            "You've recorded {} expenses totaling {:.2} (average {:.2} per expense). This month you've spent {:.2}.",
            s.expenses_count, s.total_expenses, average, s.spent_this_month
        );
    }

    if mentions(message, &["alert", "warning", "exceed", "over"]) {
        return alert_advice(s);
    }

    if mentions(message, &["advice", "recommend", "help", "tip"]) {
        let tips = [
            "Track every expense for at least a month to understand your spending patterns",
            "Set category budgets based on your income and goals",
            "Review your spending weekly and adjust as needed",
            "Automate savings transfers to build an emergency fund",
            "Cancel subscriptions you no longer use",
        ];
        let numbered: Vec<String> = tips.iter().enumerate().map(|(i, t)| format!("{}. {}", i + 1, t)).collect();
        return format!("Here are my top recommendations:\n{}", numbered.join("\n"));
    }

    "I can help with budget tracking, spending analysis, savings, category breakdowns and budget alerts. What would you like to know?".to_string()
}

fn budget_advice(s: &FinancialSnapshot) -> String {
    if s.total_budget <= Decimal::ZERO {
        return "Set up budgets for your categories. A common split is 50% needs, 30% wants and 20% savings.".to_string();
    }
    let used = percentage(s.spent_this_month, s.total_budget);
    let remaining = s.total_budget.saturating_sub(s.spent_this_month);
    if used > Decimal::ONE_HUNDRED {
        format!(
            "You've exceeded your monthly budget by {:.2}. Review your highest categories and cut discretionary spending.",
            remaining.abs()
        )
    } else if used > Decimal::from(80) {
        format!(
            "You've used {:.1}% of your monthly budget ({:.2} of {:.2}). {:.2} remains.",
            used, s.spent_this_month, s.total_budget, remaining
        )
    } else {
        format!(
            "You're on track: {:.2} spent of {:.2} ({:.1}% remaining).",
            s.spent_this_month,
            s.total_budget,
            Decimal::ONE_HUNDRED - used
        )
    }
}

fn alert_advice(s: &FinancialSnapshot) -> String {
    if s.budget_status.is_empty() {
        return "Set up budgets to get alerts when you approach or exceed your limits.".to_string();
    }
    let names = |items: Vec<&BudgetStatus>| {
        items.iter().map(|b| b.category.as_str()).collect::<Vec<_>>().join(", ")
    };

    let exceeded: Vec<&BudgetStatus> = s.budget_status.iter().filter(|b| b.spent > b.limit).collect();
    if !exceeded.is_empty() {
        return format!("You've exceeded your budget in {}: {}.", plural(exceeded.len()), names(exceeded));
    }
    let approaching: Vec<&BudgetStatus> = s
        .budget_status
        .iter()
        .filter(|b| b.percentage_used() > Decimal::from(80))
        .collect();
    if !approaching.is_empty() {
        return format!("You're approaching your limit in {}: {}.", plural(approaching.len()), names(approaching));
    }
    "All your budgets are on track.".to_string()
}

fn plural(n: usize) -> String {
    if n == 1 { "1 category".to_string() } else { format!("{} categories", n) }
}

fn suggest(message: &str) -> Vec<String> {
    let suggestions: &[&str] = if message.contains("budget") {
        &["How can I reduce my spending?", "What's my current budget status?"]
    } else if message.contains("save") || message.contains("saving") {
        &["What are my top spending categories?", "How much can I save this month?"]
    } else {
        &[
            "What's my spending breakdown by category?",
            "How can I improve my budget?",
            "What are my spending trends?",
        ]
    };
    suggestions.iter().take(MAX_SUGGESTIONS).map(|s| s.to_string()).collect()
}
