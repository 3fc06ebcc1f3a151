use async_trait::async_trait;

use famplan_data::Identity;

use crate::error::{LedgerError, Result};

/// Looks up platform users by the name shown in the guild.
#[async_trait]
pub trait Directory {
    async fn find_by_display_name(&self, name: &str) -> Result<Vec<Identity>>;
}

/// A fixed list of identities, e.g. a snapshot of the guild roster.
#[async_trait]
impl Directory for Vec<Identity> {
    async fn find_by_display_name(&self, name: &str) -> Result<Vec<Identity>> {
        Ok(self
            .iter()
            .filter(|identity| identity.display_name == name)
            .cloned()
            .collect())
    }
}

/// Pick a single identity from the candidates of a name lookup.
///
/// An explicit user id always has to be among the candidates.
/// Without one, the name has to be unique.
pub fn resolve(candidates: Vec<Identity>, explicit_id: Option<i64>) -> Result<Identity> {
    if let Some(user_id) = explicit_id {
        return candidates
            .into_iter()
            .find(|identity| identity.user_id == user_id)
            .ok_or(LedgerError::NotFound);
    }

    let mut candidates = candidates;
    match candidates.len() {
        0 => Err(LedgerError::NotFound),
        1 => candidates.pop().ok_or(LedgerError::NotFound),
        n => Err(LedgerError::AmbiguousName(n)),
    }
}
