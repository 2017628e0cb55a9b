use crate::config::AlertPolicy;
use crate::models::alert::{Alert, AlertKind, AlertReport, Severity};
use crate::models::expense::Expense;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Checks this month's spending against category limits, the monthly budget,
/// and the month's own average expense.
///
/// Alerts come out in generation order: category breaches (alphabetical),
/// then the total check, then anomalies in input order.
pub fn check_budget_alerts(
    expenses: &[Expense],
    category_budgets: &HashMap<String, Decimal>,
    monthly_budget: Decimal,
    policy: &AlertPolicy,
    today: NaiveDate,
) -> AlertReport {
    let this_month: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.date.year() == today.year() && e.date.month() == today.month())
        .collect();

    let mut spent_by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for expense in &this_month {
        let spent = spent_by_category.entry(expense.category.as_str()).or_insert(Decimal::ZERO);
        *spent = spent.saturating_add(expense.amount);
    }

    let mut alerts = Vec::new();

    for (category, spent) in &spent_by_category {
        let limit = category_budgets
            .get(*category)
            .copied()
            .filter(|l| *l > Decimal::ZERO)
            .unwrap_or(policy.default_category_limit);
        if let Some(alert) = category_alert(category, *spent, limit, policy) {
            alerts.push(alert);
        }
    }

    let total = this_month
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount));
    if total > monthly_budget.saturating_mul(policy.total_tolerance) {
        alerts.push(Alert {
            kind: AlertKind::TotalLimit,
            severity: Severity::Critical,
            message: format!(
                "Monthly spending of {:.2} exceeds your budget of {:.2}",
                total, monthly_budget
            ),
            category: None,
            current_spending: total,
            limit: monthly_budget,
        });
    }

    if this_month.len() > 1 {
        let mean = total / Decimal::from(this_month.len());
        let threshold = mean.saturating_mul(policy.anomaly_multiplier);
        for expense in this_month.iter().filter(|e| e.amount > threshold) {
            alerts.push(Alert {
                kind: AlertKind::Anomaly,
                severity: Severity::Info,
                message: format!(
                    "Unusual {} expense of {:.2}, your average this month is {:.2}",
                    expense.category, expense.amount, mean
                ),
                category: Some(expense.category.clone()),
                current_spending: expense.amount,
                limit: mean.round_dp(2),
            });
        }
    }

    let report = AlertReport::from_alerts(alerts);
    debug!(
        month_expenses = this_month.len(),
        alerts = report.total_alerts,
        critical = report.critical_count,
        warning = report.warning_count,
        "checked budget alerts"
    );
    report
}

fn category_alert(category: &str, spent: Decimal, limit: Decimal, policy: &AlertPolicy) -> Option<Alert> {
    let percentage = spent
        .checked_div(limit)
        .unwrap_or(Decimal::MAX)
        .saturating_mul(Decimal::ONE_HUNDRED);
    let (severity, message) = if percentage > Decimal::ONE_HUNDRED {
        (
            Severity::Critical,
            format!("{} budget exceeded by {:.2}", category, spent - limit),
        )
    } else if percentage > policy.warning_percentage {
        (
            Severity::Warning,
            format!("{:.1}% of {} budget used", percentage, category),
        )
    } else {
        return None;
    };

    Some(Alert {
        kind: AlertKind::CategoryLimit,
        severity,
        message,
        category: Some(category.to_string()),
        current_spending: spent,
        limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    fn on(day: u32, amount: Decimal, category: &str) -> Expense {
        Expense::new(amount, category, NaiveDate::from_ymd_opt(2025, 1, day).unwrap())
    }

    fn budgets(entries: &[(&str, i64)]) -> HashMap<String, Decimal> {
        entries
            .iter()
            .map(|(c, l)| (c.to_string(), Decimal::from(*l)))
            .collect()
    }

    fn check(expenses: &[Expense], limits: &HashMap<String, Decimal>, monthly: i64) -> AlertReport {
        check_budget_alerts(expenses, limits, Decimal::from(monthly), &AlertPolicy::default(), today())
    }

    #[test]
    fn test_no_expenses_no_alerts() {
        let report = check(&[], &HashMap::new(), 2000);
        assert!(report.alerts.is_empty());
        assert_eq!(report.total_alerts, 0);
    }

    #[test]
    fn test_spend_exactly_at_limit_is_a_warning_not_critical() {
        let report = check(&[on(2, Decimal::from(300), "food")], &budgets(&[("food", 300)]), 2000);

        assert_eq!(report.critical_count, 0);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.alerts[0].kind, AlertKind::CategoryLimit);
        assert!(report.alerts[0].message.contains("100.0%"));
    }

    #[test]
    fn test_spend_just_over_limit_is_critical() {
        let report = check(&[on(2, Decimal::from(202), "food")], &budgets(&[("food", 200)]), 2000);

        assert_eq!(report.critical_count, 1);
        let alert = &report.alerts[0];
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.current_spending - alert.limit, Decimal::from(2));
        assert!(alert.message.contains("2.00"));
    }

    #[test]
    fn test_eighty_percent_is_quiet() {
        let report = check(&[on(2, Decimal::from(80), "fun")], &budgets(&[("fun", 100)]), 2000);
        assert!(report.alerts.is_empty());

        let report = check(&[on(2, Decimal::new(8001, 2), "fun")], &budgets(&[("fun", 100)]), 2000);
        assert_eq!(report.warning_count, 1);
    }

    #[test]
    fn test_unconfigured_category_uses_default_limit() {
        let report = check(&[on(3, Decimal::from(250), "travel")], &HashMap::new(), 2000);

        assert_eq!(report.critical_count, 1);
        assert_eq!(report.alerts[0].limit, Decimal::from(200));
        assert_eq!(report.alerts[0].category.as_deref(), Some("travel"));
    }

    #[test]
    fn test_other_months_are_ignored() {
        let december = Expense::new(Decimal::from(5000), "food", NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let last_year = Expense::new(Decimal::from(5000), "food", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let report = check(&[december, last_year], &HashMap::new(), 100);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_total_tolerance_band() {
        // 2 * 55 = 110 is exactly 1.1 * 100, not over
        let at_band = [on(1, Decimal::from(55), "a"), on(2, Decimal::from(55), "b")];
        let report = check(&at_band, &HashMap::new(), 100);
        assert!(report.alerts.iter().all(|a| a.kind != AlertKind::TotalLimit));

        let over = [on(1, Decimal::from(55), "a"), on(2, Decimal::from(56), "b")];
        let report = check(&over, &HashMap::new(), 100);
        let total = report.alerts.iter().find(|a| a.kind == AlertKind::TotalLimit).unwrap();
        assert_eq!(total.severity, Severity::Critical);
        assert_eq!(total.current_spending, Decimal::from(111));
        assert_eq!(total.limit, Decimal::from(100));
        assert!(total.category.is_none());
    }

    #[test]
    fn test_anomaly_flags_only_the_outlier() {
        let history = [
            on(1, Decimal::from(10), "food"),
            on(2, Decimal::from(10), "food"),
            on(3, Decimal::from(10), "food"),
            on(4, Decimal::from(1000), "food"),
        ];
        let report = check(&history, &budgets(&[("food", 5000)]), 5000);

        let anomalies: Vec<&Alert> = report.alerts.iter().filter(|a| a.kind == AlertKind::Anomaly).collect();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].current_spending, Decimal::from(1000));
        assert_eq!(anomalies[0].limit, Decimal::new(2575, 1));
        assert_eq!(anomalies[0].severity, Severity::Info);
        assert_eq!(report.total_alerts, 1);
    }

    #[test]
    fn test_single_expense_is_never_an_anomaly() {
        let report = check(&[on(1, Decimal::from(10), "food")], &HashMap::new(), 2000);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_food_overspend_scenario() {
        let history = [on(1, Decimal::from(50), "food"), on(2, Decimal::from(500), "food")];
        let limits = budgets(&[("food", 300)]);

        let report = check(&history, &limits, 2000);
        assert_eq!(report.total_alerts, 1);
        let alert = &report.alerts[0];
        assert_eq!(alert.kind, AlertKind::CategoryLimit);
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.current_spending - alert.limit, Decimal::from(250));
        assert!(alert.message.contains("250.00"));

        let report = check(&history, &limits, 100);
        assert_eq!(report.critical_count, 2);
        assert_eq!(report.alerts[1].kind, AlertKind::TotalLimit);
        assert_eq!(report.alerts[1].current_spending, Decimal::from(550));
    }

    #[test]
    fn test_alert_ordering() {
        let history = [
            on(1, Decimal::from(5), "zoo"),
            on(2, Decimal::from(190), "books"),
            on(3, Decimal::from(5), "zoo"),
            on(4, Decimal::from(400), "art"),
            on(5, Decimal::from(5), "zoo"),
            on(6, Decimal::from(5), "zoo"),
            on(7, Decimal::from(5), "zoo"),
            on(8, Decimal::from(5), "zoo"),
        ];
        let report = check(&history, &HashMap::new(), 100);

        let kinds: Vec<(AlertKind, Option<&str>)> = report
            .alerts
            .iter()
            .map(|a| (a.kind, a.category.as_deref()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (AlertKind::CategoryLimit, Some("art")),
                (AlertKind::CategoryLimit, Some("books")),
                (AlertKind::TotalLimit, None),
                (AlertKind::Anomaly, Some("art")),
            ]
        );
        assert_eq!(report.critical_count, 2);
        assert_eq!(report.warning_count, 1);
    }

    #[test]
    fn test_huge_month_saturates_instead_of_overflowing() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let history = [on(1, huge, "food"), on(2, huge, "food")];
        let report = check(&history, &HashMap::new(), 2000);

        assert_eq!(report.total_alerts, 2);
        assert_eq!(report.critical_count, 2);
        assert_eq!(report.alerts[0].kind, AlertKind::CategoryLimit);
        assert_eq!(report.alerts[0].current_spending, Decimal::MAX);
        assert_eq!(report.alerts[1].kind, AlertKind::TotalLimit);
        assert_eq!(report.alerts[1].current_spending, Decimal::MAX);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let history = [on(1, Decimal::from(50), "food"), on(2, Decimal::from(500), "food")];
        let limits = budgets(&[("food", 300)]);
        let first = serde_json::to_string(&check(&history, &limits, 100)).unwrap();
        let second = serde_json::to_string(&check(&history, &limits, 100)).unwrap();
        assert_eq!(first, second);
    }
}
