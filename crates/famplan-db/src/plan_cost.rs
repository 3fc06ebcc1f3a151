use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteConnection, QueryBuilder, Sqlite};

use famplan_data::PlanCost;

use crate::{results::QueryError, Query, Update};

/// The fixed key of the plan cost row
pub const PLAN_COST_ID: i64 = 1;

#[async_trait]
impl Query<PlanCost> for SqliteConnection {
    type Filter = ();

    /// Fetch the plan cost. This is either empty
    /// or a single row.
    async fn query(&mut self, _filter: &Self::Filter) -> Result<Vec<PlanCost>> {
        let plan: Vec<PlanCost> = sqlx::query_as(
            r#"
            SELECT
                ROUND(monthly_cost, 10) AS monthly_cost,
                effective_date
            FROM plan_cost
            WHERE id = ?
            "#,
        )
        .bind(PLAN_COST_ID)
        .fetch_all(&mut *self)
        .await?;
        Ok(plan)
    }
}

#[async_trait]
impl Update<PlanCost> for SqliteConnection {
    /// Set the plan cost, creating the row if missing
    async fn update(&mut self, plan: PlanCost) -> Result<PlanCost> {
        let mut qry = QueryBuilder::<Sqlite>::new(
            "INSERT INTO plan_cost (id, monthly_cost, effective_date) VALUES (",
        );
        qry.separated(", ")
            .push_bind(PLAN_COST_ID)
            .push_bind(plan.monthly_cost)
            .push_bind(plan.effective_date);
        qry.push(
            r#") ON CONFLICT (id) DO UPDATE SET
                monthly_cost = excluded.monthly_cost,
                effective_date = excluded.effective_date
            "#,
        );
        qry.build().execute(&mut *self).await?;

        let plan = Query::<PlanCost>::query(self, &())
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(plan)
    }
}
