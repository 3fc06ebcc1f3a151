use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Member;

/// Members whose terms all end on the same day and
/// get a single renewal notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderBatch {
    pub end_date: NaiveDate,
    pub members: Vec<Member>,
}

impl ReminderBatch {
    pub fn user_ids(&self) -> Vec<i64> {
        self.members.iter().map(|m| m.user_id).collect()
    }
}
