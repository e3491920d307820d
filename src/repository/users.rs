//! Users repository for database operations

use sqlx::{Pool, Postgres};
use std::str::FromStr;

use crate::{
    error::{AppError, AppResult},
    models::user::{Capability, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login (authentication lookup)
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(login) = LOWER($1)")
                .bind(login)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    /// Whether the account holds an explicit capability grant.
    /// Read fresh on every check; grants are never cached between requests.
    pub async fn has_capability(&self, user_id: i32, capability: Capability) -> AppResult<bool> {
        let granted: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM user_capabilities WHERE user_id = $1 AND capability = $2)",
        )
        .bind(user_id)
        .bind(capability.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(granted)
    }

    /// All capability grants of an account
    pub async fn list_capabilities(&self, user_id: i32) -> AppResult<Vec<Capability>> {
        let slugs: Vec<String> = sqlx::query_scalar(
            "SELECT capability FROM user_capabilities WHERE user_id = $1 ORDER BY capability",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        // Unknown slugs in the table are skipped rather than failing the whole lookup
        Ok(slugs
            .iter()
            .filter_map(|s| Capability::from_str(s).ok())
            .collect())
    }
}
