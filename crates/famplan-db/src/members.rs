use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteConnection, QueryBuilder, Sqlite};

use famplan_data::{Member, MemberFilter};

use crate::{results::QueryError, Delete, Insert, Query, Retrieve, Update};

#[async_trait]
impl Query<Member> for SqliteConnection {
    type Filter = MemberFilter;

    /// Fetch members, ordered by the end of their term
    async fn query(&mut self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                user_id,
                username,
                start_date,
                end_date,
                duration,
                ROUND(cost, 10) AS cost,
                paid,
                reminded
            FROM members
            WHERE 1
            "#,
        );

        if let Some(user_id) = filter.user_id {
            qry.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(username) = filter.username.clone() {
            qry.push(" AND username = ").push_bind(username);
        }
        if let Some(end_date) = filter.end_date {
            qry.push(" AND end_date = ").push_bind(end_date);
        }
        if let Some(end_date_after) = filter.end_date_after {
            qry.push(" AND end_date >= ").push_bind(end_date_after);
        }
        if let Some(reminded) = filter.reminded {
            qry.push(" AND reminded = ").push_bind(reminded);
        }
        qry.push(" ORDER BY end_date, user_id");

        let members: Vec<Member> = qry.build_query_as().fetch_all(&mut *self).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for SqliteConnection {
    type Key = i64;

    async fn retrieve(&mut self, user_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            user_id: Some(user_id),
            ..Default::default()
        };
        let member: Member = Query::<Member>::query(self, &filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for SqliteConnection {
    async fn insert(&mut self, member: Member) -> Result<Member> {
        let mut qry = QueryBuilder::<Sqlite>::new(
            r#"INSERT INTO members (
                user_id,
                username,
                start_date,
                end_date,
                duration,
                cost,
                paid,
                reminded
            ) VALUES (
            "#,
        );
        qry.separated(", ")
            .push_bind(member.user_id)
            .push_bind(&member.username)
            .push_bind(member.start_date)
            .push_bind(member.end_date)
            .push_bind(member.duration)
            .push_bind(member.cost)
            .push_bind(member.paid)
            .push_bind(member.reminded);
        qry.push(")").build().execute(&mut *self).await?;

        self.retrieve(member.user_id).await
    }
}

#[async_trait]
impl Update<Member> for SqliteConnection {
    /// Update member
    async fn update(&mut self, member: Member) -> Result<Member> {
        QueryBuilder::<Sqlite>::new("UPDATE members SET")
            .push(" username = ")
            .push_bind(&member.username)
            .push(", start_date = ")
            .push_bind(member.start_date)
            .push(", end_date = ")
            .push_bind(member.end_date)
            .push(", duration = ")
            .push_bind(member.duration)
            .push(", cost = ")
            .push_bind(member.cost)
            .push(", paid = ")
            .push_bind(member.paid)
            .push(", reminded = ")
            .push_bind(member.reminded)
            .push(" WHERE user_id = ")
            .push_bind(member.user_id)
            .build()
            .execute(&mut *self)
            .await?;
        self.retrieve(member.user_id).await
    }
}

#[async_trait]
impl Delete<Member> for SqliteConnection {
    /// Delete member
    async fn delete(&mut self, member: Member) -> Result<()> {
        let result = QueryBuilder::<Sqlite>::new("DELETE FROM members WHERE user_id = ")
            .push_bind(member.user_id)
            .build()
            .execute(&mut *self)
            .await?;
        if result.rows_affected() == 0 {
            return Err(QueryError::NotFound.into());
        }
        Ok(())
    }
}
