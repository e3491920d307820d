//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Loan status of a copy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum InstanceStatus {
    #[default]
    Maintenance = 0,
    OnLoan = 1,
    Available = 2,
    Reserved = 3,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Maintenance => "maintenance",
            InstanceStatus::OnLoan => "on_loan",
            InstanceStatus::Available => "available",
            InstanceStatus::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Random UUID so loan records are not guessable across catalogs
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    /// Set while the copy is on loan
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: InstanceStatus,
}

/// Internal row structure for loan listing queries (instance + joined names)
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower: Option<String>,
    pub status: InstanceStatus,
}

impl LoanRow {
    pub fn into_details(self, today: NaiveDate) -> LoanDetails {
        let is_overdue = self.due_back.map(|d| d < today).unwrap_or(false);
        LoanDetails {
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            borrower_id: self.borrower_id,
            borrower: self.borrower,
            status: self.status,
            is_overdue,
        }
    }
}

/// Loaned copy with book and borrower details for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub borrower: Option<String>,
    pub status: InstanceStatus,
    pub is_overdue: bool,
}

/// Create instance request (registers a new copy)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Defaults to maintenance until the copy is shelved
    pub status: Option<InstanceStatus>,
}

/// Checkout request (lend a copy to a borrower)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub borrower_id: i32,
    /// Defaults to three weeks from today
    pub due_back: Option<NaiveDate>,
}

/// Renewal submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewRequest {
    pub due_back: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_maintenance() {
        assert_eq!(InstanceStatus::default(), InstanceStatus::Maintenance);
    }

    #[test]
    fn overdue_is_relative_to_injected_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let row = LoanRow {
            id: Uuid::new_v4(),
            book_id: 1,
            book_title: "Book title".to_string(),
            imprint: "Unlikely Imprint, 2016".to_string(),
            due_back: Some(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()),
            borrower_id: Some(1),
            borrower: Some("Surname, Dominique".to_string()),
            status: InstanceStatus::OnLoan,
        };
        assert!(row.clone().into_details(today).is_overdue);

        let row = LoanRow {
            due_back: Some(today),
            ..row
        };
        assert!(!row.into_details(today).is_overdue);
    }
}
