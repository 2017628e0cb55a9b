mod config;
mod db;
mod error;
mod models;
mod operations;
mod server;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::Settings;
use db::{alert_repository, budget_repository, prediction_repository, repository};
use models::alert::BudgetAlert;
use models::budget::limits_by_category;
use models::forecast::StoredPrediction;
use operations::add::add_transaction_to_db;
use operations::budget::{decrease_budget_db, delete_budget_db, increase_budget_db, list_budgets_db, set_budget_db};
use operations::import::import_transactions_to_db;
use operations::remove::remove_transaction_from_db;
use operations::search_by_category::search_transactions_by_category_db;
use operations::update::update_transaction_in_db;
use operations::{advisor, alerts, forecast, summary};

#[derive(Parser)]
#[command(name = "spendcast", version, about = "Expense tracking with spending forecasts and budget alerts")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the forecast and alert endpoints over HTTP
    Serve,
    /// Add a transaction: "date(YYYY-MM-DD), description, amount, type(income/expense), category"
    Add { details: String },
    /// Import transactions from a headerless CSV file
    Import { path: PathBuf },
    /// Replace the details of a transaction, keeping its ID
    Edit { id: String, details: String },
    /// Remove a transaction by ID
    Remove { id: String },
    /// Print every stored transaction
    List,
    /// Find transactions in a category
    Search { category: String },
    /// Manage category budgets
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },
    /// Forecast upcoming spending from stored expenses
    Forecast {
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        category: Option<String>,
        /// Store the forecast for the current month
        #[arg(long)]
        save: bool,
    },
    /// Budget alerts for the current month
    Alerts {
        #[command(subcommand)]
        action: AlertsAction,
    },
    /// Stored forecasts
    Predictions {
        #[command(subcommand)]
        action: PredictionsAction,
    },
    /// Spending by category over a date range (default: last 30 days)
    Summary {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Show totals per month instead
        #[arg(long, conflicts_with_all = ["from", "to"])]
        monthly: bool,
        /// Months covered by --monthly (1-12)
        #[arg(long, default_value_t = summary::DEFAULT_TREND_MONTHS)]
        months: u32,
    },
    /// Ask the advisor a question about your finances
    Ask { message: String },
}

#[derive(Subcommand)]
enum BudgetAction {
    Set { category: String, amount: String },
    Increase { category: String, amount: String },
    Decrease { category: String, amount: String },
    List,
    Delete { category: String },
    /// Spent versus limit for each budget this month
    Status,
}

#[derive(Subcommand)]
enum AlertsAction {
    Check {
        /// Store the produced alerts
        #[arg(long)]
        save: bool,
    },
    History,
}

#[derive(Subcommand)]
enum PredictionsAction {
    List {
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.settings.log_level);

    if let Command::Serve = cli.command {
        let state = server::AppState::new(cli.settings.forecast_policy(), cli.settings.alert_policy());
        return server::run_server(cli.settings.bind, state).await;
    }

    let conn = db::connection::establish_connection(&cli.settings.database)
        .with_context(|| format!("Failed to open database '{}'", cli.settings.database))?;
    run_command(&conn, &cli.settings, cli.command)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(conn: &Connection, settings: &Settings, command: Command) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    match command {
        Command::Serve => anyhow::bail!("`serve` does not run against a local database"),
        Command::Add { details } => {
            let transaction = add_transaction_to_db(conn, &details)?;
            println!("Transaction added successfully! ID: {}", transaction.id);
        }
        Command::Import { path } => {
            let count = import_transactions_to_db(conn, &path)?;
            println!("Successfully imported {} transactions.", count);
        }
        Command::Edit { id, details } => {
            let transaction = update_transaction_in_db(conn, &id, &details)?;
            println!("Transaction {} updated.", transaction.id);
        }
        Command::Remove { id } => {
            remove_transaction_from_db(conn, &id)?;
            println!("Transaction removed successfully.");
        }
        Command::List => {
            for transaction in repository::get_all_transactions(conn)? {
                print_transaction(&transaction);
            }
        }
        Command::Search { category } => {
            let transactions = search_transactions_by_category_db(conn, &category)?;
            if transactions.is_empty() {
                println!("No transactions found for category: {}", category);
            } else {
                println!("Transactions found for category '{}':", category);
                for transaction in &transactions {
                    print_transaction(transaction);
                }
            }
        }
        Command::Budget { action } => run_budget(conn, action, today)?,
        Command::Forecast { days, category, save } => {
            let policy = settings.forecast_policy();
            let days = days.filter(|d| *d > 0).unwrap_or(policy.default_days_ahead);
            let expenses = repository::get_expenses(conn)?;
            let result = forecast::forecast_spending(&expenses, days, category.as_deref(), &policy);

            println!("Predicted spending for the next {} days: {:.2}", result.days_ahead, result.total_prediction);
            println!("Trend: {} | Confidence: {}%", result.trend, result.confidence);
            for (name, amount) in &result.by_category {
                println!("  {:15} {:>12.2}", name, amount);
            }
            if save {
                let month = today.format("%Y-%m").to_string();
                let rows = prediction_repository::save_forecast(conn, &result, &month)?;
                println!("Saved {} prediction rows for {}.", rows, month);
            }
        }
        Command::Alerts { action } => match action {
            AlertsAction::Check { save } => {
                let policy = settings.alert_policy();
                let expenses = repository::get_expenses(conn)?;
                let limits = limits_by_category(&budget_repository::get_all_budgets(conn)?);
                let report = alerts::check_budget_alerts(
                    &expenses,
                    &limits,
                    policy.default_monthly_budget,
                    &policy,
                    today,
                );

                if report.alerts.is_empty() {
                    println!("No budget alerts this month.");
                }
                for alert in &report.alerts {
                    println!("[{}] {}", alert.severity.as_str(), alert.message);
                }
                if save {
                    let stored = alert_repository::add_alerts(conn, &report.alerts)?;
                    println!("Saved {} alerts.", stored);
                }
                println!(
                    "{} alerts ({} critical, {} warning)",
                    report.total_alerts, report.critical_count, report.warning_count
                );
            }
            AlertsAction::History => {
                for alert in alert_repository::get_all_alerts(conn)? {
                    println!("{}", alert_history_line(&alert));
                }
            }
        },
        Command::Predictions { action } => match action {
            PredictionsAction::List { month } => {
                let predictions = match month {
                    Some(month) => prediction_repository::get_predictions_by_month(conn, month.trim())?,
                    None => prediction_repository::get_predictions(conn)?,
                };
                for prediction in &predictions {
                    println!("{}", prediction_line(prediction));
                }
            }
            PredictionsAction::Delete { id } => {
                prediction_repository::delete_prediction(conn, id)?;
                println!("Prediction {} deleted.", id);
            }
        },
        Command::Summary { monthly: true, months, .. } => {
            let trends = summary::monthly_trends_db(conn, months, today)?;
            if trends.is_empty() {
                println!("No expenses in the last {} months.", months);
            }
            for month in &trends {
                println!("  {} {:>12.2} {:>4}", month.month, month.total, month.count);
            }
        }
        Command::Summary { from, to, .. } => {
            let report = summary::summarize_db(conn, from, to, today)?;
            println!(
                "{} - {}: {} expenses, total {:.2}, average {:.2}",
                report.start_date.format("%d.%m.%Y"),
                report.end_date.format("%d.%m.%Y"),
                report.count,
                report.total,
                report.average
            );
            for share in &report.categories {
                println!(
                    "  {:15} {:>12.2} {:>4} {:>6.2}%",
                    share.category, share.total, share.count, share.percentage
                );
            }
        }
        Command::Ask { message } => {
            let snapshot = advisor::snapshot_db(conn, today)?;
            let advice = advisor::advise(&message, &snapshot);

            println!("{}", advice.response);
            if !advice.suggestions.is_empty() {
                println!("\nYou could also ask:");
                for suggestion in &advice.suggestions {
                    println!("  - {}", suggestion);
                }
            }
        }
    }
    Ok(())
}

fn run_budget(conn: &Connection, action: BudgetAction, today: NaiveDate) -> anyhow::Result<()> {
    match action {
        BudgetAction::Set { category, amount } => {
            set_budget_db(conn, &category, &amount)?;
            println!("Budget for '{}' set to {}.", category, amount);
        }
        BudgetAction::Increase { category, amount } => {
            increase_budget_db(conn, &category, &amount)?;
            println!("Budget for '{}' increased by {}.", category, amount);
        }
        BudgetAction::Decrease { category, amount } => {
            decrease_budget_db(conn, &category, &amount)?;
            println!("Budget for '{}' decreased by {}.", category, amount);
        }
        BudgetAction::List => {
            let budgets = list_budgets_db(conn)?;
            if budgets.is_empty() {
                println!("No budgets set.");
            }
            for budget in budgets {
                println!("  {:15} {:>12.2}", budget.category, budget.amount);
            }
        }
        BudgetAction::Delete { category } => {
            delete_budget_db(conn, &category)?;
            println!("Budget for '{}' deleted.", category);
        }
        BudgetAction::Status => {
            let snapshot = advisor::snapshot_db(conn, today)?;
            if snapshot.budget_status.is_empty() {
                println!("No budgets set.");
                return Ok(());
            }
            for status in &snapshot.budget_status {
                println!(
                    "  {:15} {:>12.2} of {:>12.2} {:>12.2} left {:>7.1}%",
                    status.category,
                    status.spent,
                    status.limit,
                    status.remaining(),
                    status.percentage_used()
                );
            }
            println!(
                "Spent {:.2} of {:.2} budgeted this month.",
                snapshot.spent_this_month, snapshot.total_budget
            );
        }
    }
    Ok(())
}

fn alert_history_line(alert: &BudgetAlert) -> String {
    format!(
        "#{} {} [{}] {} ({}) {} | spent {:.2} of {:.2}",
        alert.id,
        alert.created_at,
        alert.severity,
        alert.kind,
        alert.category.as_deref().unwrap_or("-"),
        alert.message,
        alert.current_spending,
        alert.limit
    )
}

fn prediction_line(p: &StoredPrediction) -> String {
    format!(
        "#{} {} {:15} {:>12.2} confidence {:.2} ({}, saved {})",
        p.id, p.month, p.category, p.predicted_amount, p.confidence_score, p.model_version, p.created_at
    )
}

fn print_transaction(transaction: &models::transaction::Transaction) {
    println!(
        "{}  {}  {:>10.2}  {:7}  {:15}  {}",
        transaction.id,
        transaction.date,
        transaction.amount,
        transaction.transaction_type.as_str(),
        transaction.category,
        transaction.description
    );
}
