//! Unified API for the credential store.

use std::fmt::Debug;

use chrono::Utc;
use log::debug;

use crate::{
    db_types::{NewUser, Role, User},
    helpers::password::{hash_password, verify_password},
    traits::{UserApiError, UserManagement},
};

/// The `UserApi` wraps credential-store access. It owns the hashing discipline: plain passwords enter here and
/// only PHC hashes travel further down.
pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the user with the given id. If no user exists, `None` is returned.
    pub async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserApiError> {
        self.db.fetch_user_by_id(id).await
    }

    /// Fetches the user with the given email address. The address is normalised to lowercase first.
    pub async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError> {
        self.db.fetch_user_by_email(&email.to_lowercase()).await
    }

    /// Creates a new account with the `user` role. The password is hashed here; role escalation is a separate,
    /// administrative concern and deliberately not possible through signup.
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<User, UserApiError> {
        let hash = hash_password(password)?;
        let user = self.db.insert_user(NewUser::new(name, email, Role::User, hash)).await?;
        debug!("🧑️ Created account #{} for {}", user.id, user.email);
        Ok(user)
    }

    /// Checks a login attempt. Returns the user on success. A missing account, a wrong password and a
    /// deactivated account all collapse into `InvalidCredentials` so responses cannot be used to probe for
    /// registered email addresses.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, UserApiError> {
        let user = self.fetch_user_by_email(email).await?.ok_or(UserApiError::InvalidCredentials)?;
        if !user.active || !verify_password(password, &user.password_hash) {
            return Err(UserApiError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Rotates a user's password after re-checking the current one. The stored `password_changed_at` timestamp
    /// moves to now, which makes every previously issued token stale.
    pub async fn update_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<User, UserApiError> {
        let user = self.db.fetch_user_by_id(user_id).await?.ok_or(UserApiError::UserNotFound)?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(UserApiError::InvalidCredentials);
        }
        let hash = hash_password(new_password)?;
        let user = self.db.update_password(user_id, hash, Utc::now()).await?;
        debug!("🧑️ Password rotated for account #{user_id}");
        Ok(user)
    }
}
