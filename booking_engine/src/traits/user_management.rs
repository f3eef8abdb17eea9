use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{NewUser, User},
    helpers::password::PasswordHashError,
};

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User not found")]
    UserNotFound,
    #[error("A user with email address {0} already exists")]
    EmailAlreadyInUse(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Could not process password: {0}")]
    PasswordHash(String),
}

impl From<sqlx::Error> for UserApiError {
    fn from(e: sqlx::Error) -> Self {
        UserApiError::DatabaseError(e.to_string())
    }
}

impl From<PasswordHashError> for UserApiError {
    fn from(e: PasswordHashError) -> Self {
        UserApiError::PasswordHash(e.to_string())
    }
}

/// The `UserManagement` trait defines credential-store access for the gateway.
///
/// The fetch methods are the read-only adapter the authentication gate relies on: given a token subject or a
/// payment event's customer email, they resolve the live user record (including the stored password hash and the
/// password-changed-at timestamp used for token staleness checks). The write methods serve signup and password
/// rotation only.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Fetches the user with the given id. If no user exists, `None` is returned.
    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError>;

    /// Fetches the user with the given email address. The lookup is exact; callers normalise the address to
    /// lowercase before calling.
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError>;

    /// Inserts a new user record. Fails with [`UserApiError::EmailAlreadyInUse`] if the email address is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, UserApiError>;

    /// Replaces the stored password hash and records the time of the change, returning the updated record.
    /// Every token issued before `changed_at` becomes stale.
    async fn update_password(
        &self,
        user_id: i64,
        password_hash: String,
        changed_at: DateTime<Utc>,
    ) -> Result<User, UserApiError>;
}
