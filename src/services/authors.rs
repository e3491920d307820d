//! Author lifecycle service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Authors ordered by (last_name, first_name)
    pub async fn list(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(page, per_page).await
    }

    /// Author with their books
    pub async fn details(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.list_books(id).await?;
        Ok(AuthorDetails::from_author(author, books))
    }

    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let created = self.repository.authors.create(&author).await?;
        tracing::info!("Created author {} ({})", created.id, created.name());
        Ok(created)
    }

    pub async fn update(&self, id: i32, update: UpdateAuthor) -> AppResult<Author> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.update(id, &update).await
    }

    /// Delete an author. A missing author is NotFound; any other store
    /// rejection is surfaced to the caller, who keeps the author page as the
    /// fallback navigation target.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        // Resolve existence first so an unknown id is a clean 404
        self.repository.authors.get_by_id(id).await?;
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
