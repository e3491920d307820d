//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, genres, health, instances, languages, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLib API",
        version = "0.3.0",
        description = "Library catalog and circulation REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::create_instance,
        // Instances
        instances::get_instance,
        instances::delete_instance,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Genres and languages
        genres::list_genres,
        genres::create_genre,
        languages::list_languages,
        languages::create_language,
        // Loans
        loans::my_loans,
        loans::all_loans,
        loans::renewal_form,
        loans::renew,
        loans::checkout,
        loans::return_instance,
        // Stats
        stats::summary,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Instances
            crate::models::instance::BookInstance,
            crate::models::instance::InstanceStatus,
            crate::models::instance::CreateInstance,
            crate::models::instance::CheckoutRequest,
            crate::models::instance::RenewRequest,
            crate::models::instance::LoanDetails,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            authors::DeleteAuthorResponse,
            // Genres and languages
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            // Users
            crate::models::user::User,
            crate::models::user::Capability,
            // Loans
            loans::RenewalFormResponse,
            loans::RenewResponse,
            // Stats
            crate::services::catalog::CatalogSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "instances", description = "Book copy management"),
        (name = "authors", description = "Author management"),
        (name = "catalog", description = "Genres and languages"),
        (name = "loans", description = "Loans and renewals"),
        (name = "stats", description = "Catalog statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
