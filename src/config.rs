use clap::Args;
use rust_decimal::Decimal;
use std::net::SocketAddr;

/// Knobs for the moving-average forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPolicy {
    /// How many of the most recent expenses feed the moving average.
    pub window_size: usize,
    pub default_days_ahead: u32,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            window_size: 7,
            default_days_ahead: 30,
        }
    }
}

/// Thresholds used when checking a month of spending against budgets.
///
/// These are product policy, not algorithmic invariants; `Settings` can
/// override the limits per deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPolicy {
    /// Limit applied to categories with no configured budget.
    pub default_category_limit: Decimal,
    pub default_monthly_budget: Decimal,
    /// Total spend may exceed the monthly budget by this factor before alerting.
    pub total_tolerance: Decimal,
    /// Percentage of a category limit above which a warning is raised.
    pub warning_percentage: Decimal,
    /// An expense is anomalous when it exceeds the monthly mean by this factor.
    pub anomaly_multiplier: Decimal,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            default_category_limit: Decimal::from(200),
            default_monthly_budget: Decimal::from(2000),
            total_tolerance: Decimal::new(11, 1),
            warning_percentage: Decimal::from(80),
            anomaly_multiplier: Decimal::from(3),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// SQLite database file
    #[arg(long, env = "SPENDCAST_DATABASE", default_value = "spendcast.db", global = true)]
    pub database: String,

    /// Tracing filter, e.g. "info" or "spendcast=debug"
    #[arg(long, env = "SPENDCAST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "SPENDCAST_BIND", default_value = "127.0.0.1:3000", global = true)]
    pub bind: SocketAddr,

    /// Monthly budget ceiling used when a request does not carry one
    #[arg(long, env = "SPENDCAST_MONTHLY_BUDGET", default_value = "2000", global = true)]
    pub monthly_budget: Decimal,

    /// Limit for categories without a configured budget
    #[arg(long, env = "SPENDCAST_DEFAULT_CATEGORY_LIMIT", default_value = "200", global = true)]
    pub default_category_limit: Decimal,

    /// Number of recent expenses in the moving-average window
    #[arg(long, env = "SPENDCAST_WINDOW_SIZE", default_value_t = 7, global = true)]
    pub window_size: usize,
}

impl Settings {
    pub fn forecast_policy(&self) -> ForecastPolicy {
        ForecastPolicy {
            window_size: self.window_size.max(1),
            ..ForecastPolicy::default()
        }
    }

    pub fn alert_policy(&self) -> AlertPolicy {
        let defaults = AlertPolicy::default();
        AlertPolicy {
            default_category_limit: positive_or(self.default_category_limit, defaults.default_category_limit),
            default_monthly_budget: positive_or(self.monthly_budget, defaults.default_monthly_budget),
            ..defaults
        }
    }
}

fn positive_or(value: Decimal, fallback: Decimal) -> Decimal {
    if value > Decimal::ZERO { value } else { fallback }
}
