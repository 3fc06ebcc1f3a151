use serde::{Deserialize, Serialize};

use crate::PlanCost;

/// Direction of a price adjustment for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Owes,
    Refund,
    Unchanged,
}

/// Signed amount a member owes (positive) or is refunded
/// (negative) after a plan price change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub user_id: i64,
    pub username: String,
    pub remaining_months: i64,
    pub amount: f64,
    pub cost: f64,
}

impl Adjustment {
    pub fn kind(&self) -> AdjustmentKind {
        if self.amount > 0.0 {
            AdjustmentKind::Owes
        } else if self.amount < 0.0 {
            AdjustmentKind::Refund
        } else {
            AdjustmentKind::Unchanged
        }
    }
}

/// Result of changing the plan price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub previous: Option<PlanCost>,
    pub current: PlanCost,
    pub adjustments: Vec<Adjustment>,
}
