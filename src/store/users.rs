use sqlx::PgPool;

use crate::error::AppError;
use crate::models::User;

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

/// Inserts a new user. A duplicate email surfaces as the generic conflict
/// via the unique index, even when two registrations race past the
/// handler's pre-check.
pub async fn insert(pool: &PgPool, email: &str, password_hash: &str) -> Result<User, AppError> {
    let sql = format!(
        "INSERT INTO users (email, password_hash, created_at, updated_at) \
         VALUES ($1, $2, now(), now()) \
         RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

/// Email comparison is exact, case-sensitive as stored.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)
}
