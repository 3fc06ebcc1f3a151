use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::Identity;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemberFilter {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_date_after: Option<NaiveDate>,
    pub reminded: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub user_id: i64,
    pub username: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: u32,
    pub cost: f64,
    pub paid: bool,
    pub reminded: bool,
}

impl Member {
    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.username.clone())
    }

    /// Check if the term covers the date
    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
