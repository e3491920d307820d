//! API handlers for LocalLib REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod instances;
pub mod languages;
pub mod loans;
pub mod openapi;
pub mod stats;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Lists show ten entries per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Page selection query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-indexed page number
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100)
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Slice of items for the requested page
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Total number of items
    pub total: i64,
    /// Whether further pages exist
    pub has_more: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        let has_more = page * per_page < total;
        Self {
            items,
            page,
            per_page,
            total,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::genre::Genre;

    fn genres(n: usize) -> Vec<Genre> {
        (0..n)
            .map(|i| Genre {
                id: i as i32,
                name: format!("Genre {}", i),
            })
            .collect()
    }

    #[test]
    fn thirteen_items_paginate_as_ten_plus_three() {
        // page 1: full page, more to come
        let page = Page::new(genres(10), 1, 10, 13);
        assert_eq!(page.items.len(), 10);
        assert!(page.has_more);

        // page 2: the remaining three, no further pages
        let page = Page::new(genres(3), 2, 10, 13);
        assert_eq!(page.items.len(), 3);
        assert!(!page.has_more);
    }

    #[test]
    fn exact_multiple_has_no_further_page() {
        let page = Page::new(genres(10), 2, 10, 20);
        assert!(!page.has_more);
    }

    #[test]
    fn page_query_defaults_and_clamps() {
        let query = PageQuery {
            page: None,
            per_page: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), DEFAULT_PAGE_SIZE);

        let query = PageQuery {
            page: Some(0),
            per_page: Some(10_000),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }
}
