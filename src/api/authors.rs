//! Author management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetails, CreateAuthor, UpdateAuthor},
        user::Capability,
    },
};

use super::{AuthenticatedUser, Page, PageQuery};

/// Outcome of a deletion attempt, with the view the client should go to next
#[derive(Serialize, ToSchema)]
pub struct DeleteAuthorResponse {
    pub status: String,
    /// Named view to navigate to: the authors list after a successful delete,
    /// the author's own page when deletion was rejected
    pub redirect: String,
}

/// List authors ordered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Authors ordered by (last name, first name)", body = Page<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    let (page, per_page) = (query.page(), query.per_page());
    let (authors, total) = state.services.authors.list(page, per_page).await?;
    Ok(Json(Page::new(authors, page, per_page, total)))
}

/// Author detail with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.authors.details(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Missing add_author capability")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    state
        .services
        .users
        .require(claims.user_id, Capability::AddAuthor)
        .await?;

    let created = state.services.authors.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 403, description = "Missing update_author capability"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    state
        .services
        .users
        .require(claims.user_id, Capability::UpdateAuthor)
        .await?;

    let updated = state.services.authors.update(id, request).await?;
    Ok(Json(updated))
}

/// Delete an author.
///
/// Books keep existing with a cleared author reference. When the store
/// rejects the deletion the author is untouched and the response points the
/// client back at the author's page instead of the list.
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted", body = DeleteAuthorResponse),
        (status = 403, description = "Missing delete_author capability"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Deletion rejected by the store", body = DeleteAuthorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<DeleteAuthorResponse>)> {
    state
        .services
        .users
        .require(claims.user_id, Capability::DeleteAuthor)
        .await?;

    match state.services.authors.delete(id).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(DeleteAuthorResponse {
                status: "deleted".to_string(),
                redirect: "authors".to_string(),
            }),
        )),
        // Unknown author: no page to fall back to
        Err(e @ AppError::NotFound(_)) => Err(e),
        Err(e) => {
            tracing::warn!("Author {} deletion rejected: {}", id, e);
            Ok((
                StatusCode::CONFLICT,
                Json(DeleteAuthorResponse {
                    status: "failed".to_string(),
                    redirect: format!("authors/{}", id),
                }),
            ))
        }
    }
}
