//! User service: signup, login and session tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use classifieds_common::{AppError, AppResult, IdGenerator};
use classifieds_db::{
    entities::user,
    repositories::{USERNAME_TAKEN, UserRepository},
};
use sea_orm::Set;
use tracing::info;

use crate::forms::SignupForm;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user from a cleaned signup form.
    ///
    /// The new user gets a session token right away.
    pub async fn signup(&self, form: &SignupForm) -> AppResult<user::Model> {
        if self
            .user_repo
            .find_by_username(&form.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password_hash = hash_password(&form.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(form.username.clone()),
            username_lower: Set(form.username.to_lowercase()),
            password_hash: Set(password_hash),
            token: Set(Some(self.id_gen.generate_token())),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        // A concurrent signup can still win the name; the insert reports it as a conflict
        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Check credentials, returning the user with a live session token.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<user::Model>> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash)? {
            return Ok(None);
        }

        if user.token.is_some() {
            return Ok(Some(user));
        }

        let mut model: user::ActiveModel = user.into();
        model.token = Set(Some(self.id_gen.generate_token()));
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(model).await.map(Some)
    }

    /// Resolve a session token to its user.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_token(token).await
    }

    /// End every session of the user by replacing their token.
    pub async fn logout(&self, user: &user::Model) -> AppResult<()> {
        let mut model: user::ActiveModel = user.clone().into();
        model.token = Set(Some(self.id_gen.generate_token()));
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        self.user_repo.update(model).await?;

        info!(user_id = %user.id, "User logged out");
        Ok(())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
