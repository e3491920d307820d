//! Catalog management service: books, copies, genres and languages

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookShort, CreateBook, UpdateBook},
        genre::{CreateGenre, Genre},
        instance::{BookInstance, CreateInstance},
        language::{CreateLanguage, Language},
    },
    repository::Repository,
};

/// Counts shown on the catalog home page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_authors: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_visits: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Books

    pub async fn list_books(&self, page: i64, per_page: i64) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.list(page, per_page).await
    }

    pub async fn book_details(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Created book {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.update(id, &update).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {} and its copies", id);
        Ok(())
    }

    // Copies

    pub async fn create_instance(
        &self,
        book_id: i32,
        instance: CreateInstance,
    ) -> AppResult<BookInstance> {
        instance
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        // Verify parent book exists; copies cannot exist on their own
        self.repository.books.get_by_id(book_id).await?;
        self.repository.instances.create(book_id, &instance).await
    }

    pub async fn get_instance(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await
    }

    // Genres and languages

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        genre
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.genres.create(&genre).await
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        language
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.languages.create(&language).await
    }

    // Home page

    /// Catalog counts plus the running visit counter. Each call records one
    /// visit before reading the total.
    pub async fn summary(&self, today: NaiveDate) -> AppResult<CatalogSummary> {
        self.repository.visits.record(today).await?;

        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_authors: self.repository.authors.count().await?,
            num_instances: self.repository.instances.count().await?,
            num_instances_available: self.repository.instances.count_available().await?,
            num_visits: self.repository.visits.total().await?,
        })
    }
}
