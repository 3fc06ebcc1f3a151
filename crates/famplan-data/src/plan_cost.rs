use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The shared monthly price of the plan. There is
/// only ever one row of this.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlanCost {
    pub monthly_cost: f64,
    pub effective_date: NaiveDate,
}
