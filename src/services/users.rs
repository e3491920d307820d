//! Authentication and authorization service

use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Capability, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by login and password, returning a JWT token.
    /// The token carries identity only; capabilities are looked up per request.
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid login or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, user))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let Some(ref hash) = user.password_hash else {
            return Ok(false);
        };
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Current account with its capability grants
    pub async fn me(&self, user_id: i32) -> AppResult<(User, Vec<Capability>)> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let capabilities = self.repository.users.list_capabilities(user_id).await?;
        Ok((user, capabilities))
    }

    /// Whether the acting user may perform the capability's actions.
    ///
    /// `ViewOwnLoans` is implied by authentication; every other capability is
    /// an explicit, independent grant read fresh from the store so permission
    /// changes apply to the next request.
    pub async fn can(&self, user_id: i32, capability: Capability) -> AppResult<bool> {
        if capability == Capability::ViewOwnLoans {
            return Ok(true);
        }
        self.repository.users.has_capability(user_id, capability).await
    }

    /// Authorization gate used by handlers
    pub async fn require(&self, user_id: i32, capability: Capability) -> AppResult<()> {
        if self.can(user_id, capability).await? {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Missing capability: {}",
                capability
            )))
        }
    }
}
