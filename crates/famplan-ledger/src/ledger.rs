use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sqlx::{sqlite::SqliteConnection, Connection as SqlConnection};

use famplan_data::{
    Adjustment, Identity, Member, MemberFilter, PlanCost, PriceChange, ReminderBatch,
};
use famplan_db::{Connection, Delete, Insert, Query, Update};

use crate::{
    datetime::{self, CountMonths},
    error::{LedgerError, Result},
    identity::{self, Directory},
};

/// Number of members sharing the plan at enrollment.
pub const DEFAULT_DIVISOR: u32 = 6;

/// Days before the end of a term when the renewal notice goes out.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub divisor: u32,
    pub reminder_lookahead_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_DIVISOR,
            reminder_lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

/// The subscription ledger: members of the plan, their
/// terms and what they owe.
///
/// Every mutating operation runs in a single transaction,
/// a failure at any point leaves the store untouched.
#[derive(Clone)]
pub struct Ledger {
    db: Connection,
    config: LedgerConfig,
}

/// Get the plan cost, if there is one
async fn current_plan(conn: &mut SqliteConnection) -> Result<Option<PlanCost>> {
    let plan = Query::<PlanCost>::query(conn, &()).await?.pop();
    Ok(plan)
}

async fn query_members(conn: &mut SqliteConnection, filter: &MemberFilter) -> Result<Vec<Member>> {
    let members = Query::<Member>::query(conn, filter).await?;
    Ok(members)
}

/// Get a member by user id, if enrolled
async fn find_member(conn: &mut SqliteConnection, user_id: i64) -> Result<Option<Member>> {
    let filter = MemberFilter {
        user_id: Some(user_id),
        ..Default::default()
    };
    Ok(query_members(conn, &filter).await?.pop())
}

/// Durations are whole, positive months
fn check_duration(duration: i64) -> Result<u32> {
    match u32::try_from(duration) {
        Ok(months) if months > 0 => Ok(months),
        _ => Err(LedgerError::InvalidDuration(duration)),
    }
}

impl Ledger {
    pub fn new(db: Connection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Enroll a member for `duration` months starting at
    /// `start_date`. The member pays their share of the plan.
    pub async fn enroll(
        &self,
        identity: &Identity,
        start_date: NaiveDate,
        duration: i64,
    ) -> Result<Member> {
        let months = check_duration(duration)?;
        let end_date = datetime::add_terms(start_date, months)
            .ok_or(LedgerError::InvalidDuration(duration))?;

        let mut conn = self.db.lock().await;
        let mut tx = conn.begin().await?;

        let plan = current_plan(&mut tx)
            .await?
            .ok_or(LedgerError::PlanCostUnset)?;
        if find_member(&mut tx, identity.user_id).await?.is_some() {
            return Err(LedgerError::AlreadyEnrolled);
        }

        let share = plan.monthly_cost / f64::from(self.config.divisor);
        let member = tx
            .insert(Member {
                user_id: identity.user_id,
                username: identity.display_name.clone(),
                start_date,
                end_date,
                duration: months,
                cost: share * f64::from(months),
                paid: true,
                reminded: false,
            })
            .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = member.user_id,
            username = %member.username,
            %end_date,
            cost = member.cost,
            "enrolled member"
        );
        Ok(member)
    }

    /// Remove a member from the plan
    pub async fn remove(&self, user_id: i64) -> Result<Member> {
        let mut conn = self.db.lock().await;
        let mut tx = conn.begin().await?;

        let member = find_member(&mut tx, user_id)
            .await?
            .ok_or(LedgerError::NotFound)?;
        tx.delete(member.clone()).await?;
        tx.commit().await?;

        tracing::info!(user_id, username = %member.username, "removed member");
        Ok(member)
    }

    /// All members, ordered by the end of their term,
    /// then by user id.
    pub async fn list(&self) -> Result<Vec<Member>> {
        let mut conn = self.db.lock().await;
        query_members(&mut conn, &MemberFilter::default()).await
    }

    /// Get the record of a single member
    pub async fn get_self(&self, user_id: i64) -> Result<Member> {
        let mut conn = self.db.lock().await;
        find_member(&mut conn, user_id)
            .await?
            .ok_or(LedgerError::NotFound)
    }

    /// Change the monthly cost of the plan from `effective_date` on.
    ///
    /// Every member whose term ends on or after the effective date
    /// now costs the new price for each remaining calendar month.
    /// The adjustment is the signed difference to the old price.
    pub async fn set_monthly_cost(
        &self,
        new_cost: f64,
        effective_date: NaiveDate,
    ) -> Result<PriceChange> {
        if !new_cost.is_finite() || new_cost < 0.0 {
            return Err(LedgerError::InvalidCost(new_cost));
        }

        let mut conn = self.db.lock().await;
        let mut tx = conn.begin().await?;

        let previous = current_plan(&mut tx).await?;
        let current = tx
            .update(PlanCost {
                monthly_cost: new_cost,
                effective_date,
            })
            .await?;

        let mut adjustments = Vec::new();
        // Without a previous price there is nothing to adjust against.
        if let Some(previous) = &previous {
            let filter = MemberFilter {
                end_date_after: Some(effective_date),
                ..Default::default()
            };
            let members = query_members(&mut tx, &filter).await?;
            for mut member in members {
                let remaining_months = effective_date.count_months(&member.end_date);
                let months = remaining_months as f64;
                let amount = months * (new_cost - previous.monthly_cost);

                member.cost = months * new_cost;
                let member = tx.update(member).await?;

                adjustments.push(Adjustment {
                    user_id: member.user_id,
                    username: member.username,
                    remaining_months,
                    amount,
                    cost: member.cost,
                });
            }
        }
        tx.commit().await?;

        tracing::info!(
            monthly_cost = new_cost,
            %effective_date,
            adjusted = adjustments.len(),
            "updated plan cost"
        );
        Ok(PriceChange {
            previous,
            current,
            adjustments,
        })
    }

    /// Get the current plan cost
    pub async fn get_monthly_cost(&self) -> Result<PlanCost> {
        let mut conn = self.db.lock().await;
        current_plan(&mut conn)
            .await?
            .ok_or(LedgerError::PlanCostUnset)
    }

    /// Extend the term of a member by `duration` months.
    /// This starts a new term: the member paid the full
    /// plan price per month and has not been reminded yet.
    pub async fn renew(&self, user_id: i64, duration: i64) -> Result<Member> {
        let months = check_duration(duration)?;

        let mut conn = self.db.lock().await;
        let mut tx = conn.begin().await?;

        let mut member = find_member(&mut tx, user_id)
            .await?
            .ok_or(LedgerError::NotFound)?;
        let plan = current_plan(&mut tx)
            .await?
            .ok_or(LedgerError::PlanCostUnset)?;

        member.end_date = datetime::add_terms(member.end_date, months)
            .ok_or(LedgerError::InvalidDuration(duration))?;
        member.duration = months;
        member.cost = plan.monthly_cost * f64::from(months);
        member.paid = true;
        member.reminded = false;

        let member = tx.update(member).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            end_date = %member.end_date,
            cost = member.cost,
            "renewed member"
        );
        Ok(member)
    }

    /// Find members due for a renewal notice: their term ends
    /// exactly `lookahead_days` after `today` and they have not
    /// been reminded. Members are grouped by end date.
    ///
    /// This does not change anything, see `mark_reminded`.
    pub async fn scan_due_reminders(
        &self,
        today: NaiveDate,
        lookahead_days: u32,
    ) -> Result<Vec<ReminderBatch>> {
        let due = today
            .checked_add_days(Days::new(u64::from(lookahead_days)))
            .ok_or_else(|| LedgerError::InvalidDate(today.to_string()))?;

        let filter = MemberFilter {
            end_date: Some(due),
            reminded: Some(false),
            ..Default::default()
        };
        let members = {
            let mut conn = self.db.lock().await;
            query_members(&mut conn, &filter).await?
        };

        let mut batches: BTreeMap<NaiveDate, Vec<Member>> = BTreeMap::new();
        for member in members {
            batches.entry(member.end_date).or_default().push(member);
        }
        tracing::debug!(%due, batches = batches.len(), "scanned for due reminders");

        Ok(batches
            .into_iter()
            .map(|(end_date, members)| ReminderBatch { end_date, members })
            .collect())
    }

    /// Record that a renewal notice for the term ending on
    /// `end_date` went out to the members. Their current term
    /// counts as unpaid from here on.
    ///
    /// Members that were removed, renewed or already reminded
    /// since the scan are skipped: the notice was not about
    /// their current term.
    pub async fn mark_reminded(
        &self,
        end_date: NaiveDate,
        user_ids: &[i64],
    ) -> Result<Vec<Member>> {
        let mut conn = self.db.lock().await;
        let mut tx = conn.begin().await?;

        let mut members = Vec::with_capacity(user_ids.len());
        for &user_id in user_ids {
            let Some(mut member) = find_member(&mut tx, user_id).await? else {
                tracing::debug!(user_id, "member left before the reminder was recorded");
                continue;
            };
            if member.end_date != end_date || member.reminded {
                tracing::debug!(
                    user_id,
                    end_date = %member.end_date,
                    "term changed before the reminder was recorded"
                );
                continue;
            }
            member.reminded = true;
            member.paid = false;
            members.push(tx.update(member).await?);
        }
        tx.commit().await?;

        tracing::info!(%end_date, count = members.len(), "marked members as reminded");
        Ok(members)
    }

    /// Enrolled members shown under `name`
    pub async fn find_by_display_name(&self, name: &str) -> Result<Vec<Identity>> {
        let filter = MemberFilter {
            username: Some(name.to_string()),
            ..Default::default()
        };
        let members = {
            let mut conn = self.db.lock().await;
            query_members(&mut conn, &filter).await?
        };
        Ok(members.iter().map(Member::identity).collect())
    }

    /// Find an enrolled member by name, using the user id to
    /// tell apart members with the same name.
    pub async fn resolve_member(&self, name: &str, explicit_id: Option<i64>) -> Result<Member> {
        let candidates = self.find_by_display_name(name).await?;
        let identity = identity::resolve(candidates, explicit_id)?;
        self.get_self(identity.user_id).await
    }
}

#[async_trait]
impl Directory for Ledger {
    async fn find_by_display_name(&self, name: &str) -> Result<Vec<Identity>> {
        Ledger::find_by_display_name(self, name).await
    }
}
