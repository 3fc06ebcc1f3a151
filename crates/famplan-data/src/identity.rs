use serde::{Deserialize, Serialize};

/// A chat platform user: the snowflake id and the
/// name shown in the guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub display_name: String,
}

impl Identity {
    pub fn new(user_id: i64, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
        }
    }

    /// Platform mention markup for this user
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}
