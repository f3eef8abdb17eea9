use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::UserApiError,
};

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, UserApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, UserApiError> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

/// Inserts a new user record. A clash on the unique email column is reported as `EmailAlreadyInUse` rather than a
/// bare database error so that the signup route can answer with something actionable.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, UserApiError> {
    let result = sqlx::query_as(
        r#"
            INSERT INTO users (name, email, role, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.email.clone())
    .bind(user.role)
    .bind(user.password_hash)
    .bind(Utc::now())
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🧑️ New user record created");
            Ok(user)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(UserApiError::EmailAlreadyInUse(user.email)),
        Err(e) => Err(e.into()),
    }
}

/// Replaces the stored password hash and stamps the change time. Returns the updated record, or `UserNotFound` if
/// the id does not exist.
pub async fn update_password(
    user_id: i64,
    password_hash: String,
    changed_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<User, UserApiError> {
    let result = sqlx::query_as(
        r#"
            UPDATE users SET password_hash = $1, password_changed_at = $2
            WHERE id = $3
            RETURNING *;
        "#,
    )
    .bind(password_hash)
    .bind(changed_at)
    .bind(user_id)
    .fetch_one(conn)
    .await;
    match result {
        Ok(user) => {
            debug!("🧑️ Password updated for user #{user_id}");
            Ok(user)
        },
        Err(sqlx::Error::RowNotFound) => Err(UserApiError::UserNotFound),
        Err(e) => Err(e.into()),
    }
}
