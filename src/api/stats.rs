//! Catalog home page statistics

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{error::AppResult, services::catalog::CatalogSummary};

/// Catalog summary with visit counter
#[utoipa::path(
    get,
    path = "/summary",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog counts and visits", body = CatalogSummary)
    )
)]
pub async fn summary(State(state): State<crate::AppState>) -> AppResult<Json<CatalogSummary>> {
    let today = Utc::now().date_naive();
    let summary = state.services.catalog.summary(today).await?;
    Ok(Json(summary))
}
