//! Book instances repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{BookInstance, CreateInstance, InstanceStatus, LoanRow},
};

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Register a new copy of a book. The identifier is generated here so
    /// records are not guessable across catalogs.
    pub async fn create(&self, book_id: i32, instance: &CreateInstance) -> AppResult<BookInstance> {
        let created = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Withdraw a copy
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    /// Renewal write: a single-column UPDATE of due_back. Concurrent renewals
    /// of the same copy resolve last-writer-wins.
    pub async fn update_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            "UPDATE book_instances SET due_back = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Checkout write: status, borrower and due date move together so the
    /// on-loan invariant holds.
    pub async fn set_on_loan(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = $2, borrower_id = $3, due_back = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(InstanceStatus::OnLoan)
        .bind(borrower_id)
        .bind(due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Return write: clears borrower and due date together with the status.
    pub async fn set_available(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = $2, borrower_id = NULL, due_back = NULL
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(InstanceStatus::Available)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn list_borrowed_by_user(
        &self,
        borrower_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanRow>, i64)> {
        let offset = (page - 1) * per_page;

        let rows = sqlx::query_as::<_, LoanRow>(
            r#"
            SELECT i.id, i.book_id, b.title AS book_title, i.imprint, i.due_back,
                   i.borrower_id, u.last_name || ', ' || u.first_name AS borrower,
                   i.status
            FROM book_instances i
            JOIN books b ON i.book_id = b.id
            LEFT JOIN users u ON i.borrower_id = u.id
            WHERE i.borrower_id = $1 AND i.status = $2
            ORDER BY i.due_back, i.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(borrower_id)
        .bind(InstanceStatus::OnLoan)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE borrower_id = $1 AND status = $2",
        )
        .bind(borrower_id)
        .bind(InstanceStatus::OnLoan)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// All copies on loan, soonest due first
    pub async fn list_all_borrowed(
        &self,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<LoanRow>, i64)> {
        let offset = (page - 1) * per_page;

        let rows = sqlx::query_as::<_, LoanRow>(
            r#"
            SELECT i.id, i.book_id, b.title AS book_title, i.imprint, i.due_back,
                   i.borrower_id, u.last_name || ', ' || u.first_name AS borrower,
                   i.status
            FROM book_instances i
            JOIN books b ON i.book_id = b.id
            LEFT JOIN users u ON i.borrower_id = u.id
            WHERE i.status = $1
            ORDER BY i.due_back, i.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(InstanceStatus::OnLoan)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::OnLoan)
                .fetch_one(&self.pool)
                .await?;

        Ok((rows, total))
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available for loan
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::Available)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
