//! Visits repository: per-day counters for the catalog summary page

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record one visit for the given day and return its updated count
    pub async fn record(&self, day: NaiveDate) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO visits (count_date, count)
            VALUES ($1, 1)
            ON CONFLICT (count_date) DO UPDATE SET count = visits.count + 1
            RETURNING count
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Total visit count across all days
    pub async fn total(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(count), 0)::bigint FROM visits")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
