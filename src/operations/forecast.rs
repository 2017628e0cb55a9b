//! Short-horizon spending forecast.
//!
//! The forecast is a moving average of the most recent expenses, scaled by a
//! trend ratio (second half of the history against the first half) and
//! extrapolated to the requested horizon. Expenses must already be in
//! ascending date order; nothing here sorts them.

use crate::config::ForecastPolicy;
use crate::models::expense::Expense;
use crate::models::forecast::SpendingForecast;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

const DAYS_PER_WEEK: i64 = 7;
const SATURATION_COUNT: usize = 10;

pub fn forecast_spending(
    expenses: &[Expense],
    days_ahead: u32,
    category: Option<&str>,
    policy: &ForecastPolicy,
) -> SpendingForecast {
    let selected: Vec<&Expense> = expenses
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect();

    if selected.is_empty() {
        return SpendingForecast {
            total_prediction: Decimal::ZERO,
            by_category: BTreeMap::new(),
            trend: Decimal::ONE,
            confidence: 0,
            days_ahead,
        };
    }

    let amounts: Vec<Decimal> = selected.iter().map(|e| e.amount).collect();
    let trend = trend_ratio(&amounts);
    let total_prediction = predict(&amounts, days_ahead, policy.window_size);

    let mut grouped: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for expense in &selected {
        grouped
            .entry(expense.category.clone())
            .or_default()
            .push(expense.amount);
    }
    let by_category = grouped
        .into_iter()
        .map(|(name, amounts)| (name, predict(&amounts, days_ahead, policy.window_size)))
        .collect();

    let forecast = SpendingForecast {
        total_prediction,
        by_category,
        trend: trend.round_dp(4),
        confidence: confidence(selected.len()),
        days_ahead,
    };
    debug!(
        expenses = selected.len(),
        total = %forecast.total_prediction,
        trend = %forecast.trend,
        confidence = forecast.confidence,
        "computed spending forecast"
    );
    forecast
}

fn predict(amounts: &[Decimal], days_ahead: u32, window_size: usize) -> Decimal {
    let horizon = Decimal::from(days_ahead) / Decimal::from(DAYS_PER_WEEK);
    let prediction = moving_average(amounts, window_size)
        .saturating_mul(trend_ratio(amounts))
        .saturating_mul(horizon);
    prediction.max(Decimal::ZERO).round_dp(2)
}

pub fn moving_average(amounts: &[Decimal], window_size: usize) -> Decimal {
    let start = amounts.len().saturating_sub(window_size.max(1));
    mean(&amounts[start..])
}

/// 1 means flat, above 1 rising, below 1 falling.
pub fn trend_ratio(amounts: &[Decimal]) -> Decimal {
    if amounts.len() < 2 {
        return Decimal::ONE;
    }
    let (first, second) = amounts.split_at(amounts.len() / 2);
    let mut first_mean = mean(first);
    if first_mean.is_zero() {
        first_mean = Decimal::ONE;
    }
    let second_mean = mean(second);
    second_mean.checked_div(first_mean).unwrap_or_else(|| {
        if second_mean.is_sign_negative() != first_mean.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Grows with sample size only and saturates at ten expenses.
pub fn confidence(count: usize) -> u8 {
    if count == 0 {
        return 0;
    }
    let capped = count.min(SATURATION_COUNT) as u8;
    (40 + capped * 6).min(100)
}

fn mean(amounts: &[Decimal]) -> Decimal {
    if amounts.is_empty() {
        return Decimal::ZERO;
    }
    // Sums saturate at the Decimal bounds instead of panicking.
    let total = amounts
        .iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));
    total / Decimal::from(amounts.len())
}
