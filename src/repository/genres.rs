//! Genres repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::genre::{CreateGenre, Genre},
};

#[derive(Clone)]
pub struct GenresRepository {
    pool: Pool<Postgres>,
}

impl GenresRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    /// Create a new genre; the name is unique
    pub async fn create(&self, genre: &CreateGenre) -> AppResult<Genre> {
        let created =
            sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING *")
                .bind(&genre.name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db) = e {
                        if db.is_unique_violation() {
                            return AppError::Conflict(format!(
                                "Genre '{}' already exists",
                                genre.name
                            ));
                        }
                    }
                    AppError::Database(e)
                })?;
        Ok(created)
    }
}
