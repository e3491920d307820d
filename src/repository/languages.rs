//! Languages repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::{CreateLanguage, Language},
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all languages ordered by name
    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>("SELECT * FROM languages ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(languages)
    }

    /// Create a new language; the name is unique
    pub async fn create(&self, language: &CreateLanguage) -> AppResult<Language> {
        let created =
            sqlx::query_as::<_, Language>("INSERT INTO languages (name) VALUES ($1) RETURNING *")
                .bind(&language.name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(ref db) = e {
                        if db.is_unique_violation() {
                            return AppError::Conflict(format!(
                                "Language '{}' already exists",
                                language.name
                            ));
                        }
                    }
                    AppError::Database(e)
                })?;
        Ok(created)
    }
}
