//! Circulation service: renewal validation and workflow, checkout and return

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::instance::{BookInstance, InstanceStatus, LoanDetails},
    repository::Repository,
};

/// A renewal may extend a loan at most four weeks from today
pub const MAX_RENEWAL_DAYS: i64 = 28;
/// Renewal period offered as the form default: three weeks
pub const DEFAULT_RENEWAL_DAYS: i64 = 21;

/// Renewal date rejection reasons
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    InPast,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

impl From<RenewalDateError> for AppError {
    fn from(e: RenewalDateError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Decide whether a proposed due-back date is acceptable.
///
/// Both boundaries are inclusive: today itself and exactly four weeks out
/// pass. The validated date is returned unchanged. `today` is injected by the
/// caller.
pub fn validate_renewal_date(
    proposed: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RenewalDateError> {
    if proposed < today {
        return Err(RenewalDateError::InPast);
    }
    if proposed > today + Duration::days(MAX_RENEWAL_DAYS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(proposed)
}

/// Initial value offered to the renewal form
pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_RENEWAL_DAYS)
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Display intent of the renewal flow: the copy plus a suggested due-back
    /// date. No state is touched.
    pub async fn renewal_form(
        &self,
        instance_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<(BookInstance, NaiveDate)> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        Ok((instance, default_renewal_date(today)))
    }

    /// Submit intent of the renewal flow: validate the proposed date and
    /// persist it. Validation failure leaves the stored copy untouched; a
    /// successful renewal writes due_back and nothing else.
    pub async fn renew(
        &self,
        instance_id: Uuid,
        proposed: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<BookInstance> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        let validated = validate_renewal_date(proposed, today)?;

        let updated = self
            .repository
            .instances
            .update_due_back(instance.id, validated)
            .await?;

        tracing::info!("Renewed copy {} until {}", updated.id, validated);
        Ok(updated)
    }

    /// Copies on loan to the given user, soonest due first
    pub async fn my_loans(
        &self,
        user_id: i32,
        page: i64,
        per_page: i64,
        today: NaiveDate,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let (rows, total) = self
            .repository
            .instances
            .list_borrowed_by_user(user_id, page, per_page)
            .await?;
        Ok((rows.into_iter().map(|r| r.into_details(today)).collect(), total))
    }

    /// All copies on loan, soonest due first
    pub async fn all_loans(
        &self,
        page: i64,
        per_page: i64,
        today: NaiveDate,
    ) -> AppResult<(Vec<LoanDetails>, i64)> {
        let (rows, total) = self
            .repository
            .instances
            .list_all_borrowed(page, per_page)
            .await?;
        Ok((rows.into_iter().map(|r| r.into_details(today)).collect(), total))
    }

    /// Lend an available copy to a borrower
    pub async fn checkout(
        &self,
        instance_id: Uuid,
        borrower_id: i32,
        due_back: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AppResult<BookInstance> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        if instance.status != InstanceStatus::Available {
            return Err(AppError::Conflict(format!(
                "Copy {} is not available for loan ({})",
                instance.id, instance.status
            )));
        }

        // Verify borrower exists
        self.repository.users.get_by_id(borrower_id).await?;

        let due = match due_back {
            Some(date) => validate_renewal_date(date, today)?,
            None => default_renewal_date(today),
        };

        let updated = self
            .repository
            .instances
            .set_on_loan(instance.id, borrower_id, due)
            .await?;

        tracing::info!(
            "Checked out copy {} to user {} until {}",
            updated.id,
            borrower_id,
            due
        );
        Ok(updated)
    }

    /// Take back a copy on loan
    pub async fn return_instance(&self, instance_id: Uuid) -> AppResult<BookInstance> {
        let instance = self.repository.instances.get_by_id(instance_id).await?;
        if instance.status != InstanceStatus::OnLoan {
            return Err(AppError::Conflict(format!(
                "Copy {} is not on loan ({})",
                instance.id, instance.status
            )));
        }

        let updated = self.repository.instances.set_available(instance.id).await?;
        tracing::info!("Returned copy {}", updated.id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renewal_boundaries_are_inclusive() {
        let today = date(2024, 1, 1);

        // today itself is acceptable
        assert_eq!(validate_renewal_date(today, today), Ok(today));
        // yesterday is not
        assert_eq!(
            validate_renewal_date(date(2023, 12, 31), today),
            Err(RenewalDateError::InPast)
        );
        // exactly four weeks out is acceptable
        assert_eq!(
            validate_renewal_date(date(2024, 1, 29), today),
            Ok(date(2024, 1, 29))
        );
        // one day past four weeks is not
        assert_eq!(
            validate_renewal_date(date(2024, 1, 30), today),
            Err(RenewalDateError::TooFarAhead)
        );
    }

    #[test]
    fn renewal_returns_date_unchanged_across_whole_window() {
        let today = date(2024, 1, 1);
        for offset in 0..=MAX_RENEWAL_DAYS {
            let proposed = today + Duration::days(offset);
            assert_eq!(validate_renewal_date(proposed, today), Ok(proposed));
        }
    }

    #[test]
    fn renewal_rejects_any_past_date() {
        let today = date(2024, 6, 15);
        for offset in 1..60 {
            let proposed = today - Duration::days(offset);
            assert_eq!(
                validate_renewal_date(proposed, today),
                Err(RenewalDateError::InPast)
            );
        }
    }

    #[test]
    fn renewal_rejects_dates_beyond_four_weeks() {
        let today = date(2024, 6, 15);
        for offset in 1..60 {
            let proposed = today + Duration::days(MAX_RENEWAL_DAYS + offset);
            assert_eq!(
                validate_renewal_date(proposed, today),
                Err(RenewalDateError::TooFarAhead)
            );
        }
    }

    #[test]
    fn form_default_is_three_weeks_out() {
        let today = date(2024, 1, 1);
        assert_eq!(default_renewal_date(today), date(2024, 1, 22));
    }

    #[test]
    fn date_errors_render_form_messages() {
        assert_eq!(
            RenewalDateError::InPast.to_string(),
            "Invalid date - renewal in past"
        );
        assert_eq!(
            RenewalDateError::TooFarAhead.to_string(),
            "Invalid date - renewal more than 4 weeks ahead"
        );
    }
}
