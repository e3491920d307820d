//! User account model, capabilities and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Named permission a user account may hold.
///
/// Grants are independent: holding one capability implies nothing about the
/// others. `ViewOwnLoans` is implied by being authenticated and is never
/// stored as a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewOwnLoans,
    MarkReturned,
    AddAuthor,
    UpdateAuthor,
    DeleteAuthor,
    ManageCatalog,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ViewOwnLoans => "view_own_loans",
            Capability::MarkReturned => "mark_returned",
            Capability::AddAuthor => "add_author",
            Capability::UpdateAuthor => "update_author",
            Capability::DeleteAuthor => "delete_author",
            Capability::ManageCatalog => "manage_catalog",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view_own_loans" => Ok(Capability::ViewOwnLoans),
            "mark_returned" => Ok(Capability::MarkReturned),
            "add_author" => Ok(Capability::AddAuthor),
            "update_author" => Ok(Capability::UpdateAuthor),
            "delete_author" => Ok(Capability::DeleteAuthor),
            "manage_catalog" => Ok(Capability::ManageCatalog),
            _ => Err(format!("Unknown capability: {}", s)),
        }
    }
}

/// JWT claims for authenticated users.
///
/// Claims carry identity only. Capabilities are resolved against the database
/// on every request so a revoked grant takes effect immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn capability_slugs_round_trip() {
        for cap in [
            Capability::ViewOwnLoans,
            Capability::MarkReturned,
            Capability::AddAuthor,
            Capability::UpdateAuthor,
            Capability::DeleteAuthor,
            Capability::ManageCatalog,
        ] {
            assert_eq!(Capability::from_str(cap.as_str()), Ok(cap));
        }
    }

    #[test]
    fn unknown_capability_is_rejected() {
        assert!(Capability::from_str("mark_retained").is_err());
    }
}
