use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudget {
    pub id: i32,
    pub category: String,
    pub amount: Decimal,
}

/// Category label to limit, the shape the alert checker expects.
pub fn limits_by_category(budgets: &[CategoryBudget]) -> HashMap<String, Decimal> {
    budgets
        .iter()
        .map(|b| (b.category.clone(), b.amount))
        .collect()
}
