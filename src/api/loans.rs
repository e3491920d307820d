//! Loan and renewal endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        instance::{BookInstance, CheckoutRequest, LoanDetails, RenewRequest},
        user::Capability,
    },
};

use super::{AuthenticatedUser, Page, PageQuery};

/// Renewal form data: the copy plus the suggested new due date
#[derive(Serialize, ToSchema)]
pub struct RenewalFormResponse {
    pub instance: BookInstance,
    /// Three weeks from today; a suggestion, not a validation bound
    pub default_due_back: NaiveDate,
}

/// Successful renewal, pointing the client at the all-loans view
#[derive(Serialize, ToSchema)]
pub struct RenewResponse {
    pub instance: BookInstance,
    pub redirect: String,
}

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Own loans, soonest due first", body = Page<LoanDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<LoanDetails>>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::ViewOwnLoans)
        .await?;

    let (page, per_page) = (query.page(), query.per_page());
    let today = Utc::now().date_naive();
    let (loans, total) = state
        .services
        .loans
        .my_loans(claims.user_id, page, per_page, today)
        .await?;
    Ok(Json(Page::new(loans, page, per_page, total)))
}

/// All copies on loan, any borrower
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All loans, soonest due first", body = Page<LoanDetails>),
        (status = 403, description = "Missing mark_returned capability")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<LoanDetails>>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::MarkReturned)
        .await?;

    let (page, per_page) = (query.page(), query.per_page());
    let today = Utc::now().date_naive();
    let (loans, total) = state
        .services
        .loans
        .all_loans(page, per_page, today)
        .await?;
    Ok(Json(Page::new(loans, page, per_page, total)))
}

/// Renewal form data for a copy.
///
/// Librarians holding `mark_returned` may renew any borrower's loan, not only
/// their own.
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy and suggested due date", body = RenewalFormResponse),
        (status = 403, description = "Missing mark_returned capability"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalFormResponse>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::MarkReturned)
        .await?;

    let today = Utc::now().date_naive();
    let (instance, default_due_back) = state.services.loans.renewal_form(id, today).await?;
    Ok(Json(RenewalFormResponse {
        instance,
        default_due_back,
    }))
}

/// Renew a loan until the proposed date
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewRequest,
    responses(
        (status = 200, description = "Loan renewed", body = RenewResponse),
        (status = 400, description = "Date in the past or more than 4 weeks ahead"),
        (status = 403, description = "Missing mark_returned capability"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<RenewRequest>,
) -> AppResult<Json<RenewResponse>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::MarkReturned)
        .await?;

    let today = Utc::now().date_naive();
    let instance = state.services.loans.renew(id, request.due_back, today).await?;
    Ok(Json(RenewResponse {
        instance,
        redirect: "loans".to_string(),
    }))
}

/// Lend an available copy to a borrower
#[utoipa::path(
    post,
    path = "/instances/{id}/checkout",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Copy checked out", body = BookInstance),
        (status = 403, description = "Missing mark_returned capability"),
        (status = 404, description = "Copy or borrower not found"),
        (status = 409, description = "Copy not available")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<BookInstance>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::MarkReturned)
        .await?;

    let today = Utc::now().date_naive();
    let instance = state
        .services
        .loans
        .checkout(id, request.borrower_id, request.due_back, today)
        .await?;
    Ok(Json(instance))
}

/// Take back a copy on loan
#[utoipa::path(
    post,
    path = "/instances/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy returned", body = BookInstance),
        (status = 403, description = "Missing mark_returned capability"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy not on loan")
    )
)]
pub async fn return_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::MarkReturned)
        .await?;

    let instance = state.services.loans.return_instance(id).await?;
    Ok(Json(instance))
}
