use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;

const TASK_COLUMNS: &str = "id, user_id, title, description, is_complete, created_at, updated_at";

/// The one owner+id lookup. Every id-scoped operation resolves its row
/// through this predicate, either as a plain read or locked inside a
/// transaction for read-then-write operations, so "absent" and "owned by
/// someone else" are indistinguishable everywhere by construction.
fn owned_lookup_sql() -> String {
    format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2")
}

/// Resolves a task by id under the given owner. A record under a different
/// owner reads as absent.
pub async fn find_owned<'e, E>(executor: E, owner: i32, id: Uuid) -> Result<Option<Task>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = owned_lookup_sql();
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .bind(owner)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Same lookup, but holding a row lock for the rest of the transaction so a
/// concurrent mutation of the same task serializes instead of losing an
/// update.
async fn lock_owned(
    tx: &mut Transaction<'_, Postgres>,
    owner: i32,
    id: Uuid,
) -> Result<Option<Task>, AppError> {
    let sql = format!("{} FOR UPDATE", owned_lookup_sql());
    sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::from)
}

/// Inserts a task under the given owner with the title stored trimmed,
/// completion off, and both timestamps set to the same instant.
pub async fn create(
    pool: &PgPool,
    owner: i32,
    title: &str,
    description: Option<&str>,
) -> Result<Task, AppError> {
    let sql = format!(
        "INSERT INTO tasks (id, user_id, title, description, is_complete, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, FALSE, $5, $5) \
         RETURNING {TASK_COLUMNS}"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(title.trim())
        .bind(description)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(AppError::from)
}

/// All of the owner's tasks, in insertion order.
pub async fn list(pool: &PgPool, owner: i32) -> Result<Vec<Task>, AppError> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at, id"
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)
}

/// Applies the supplied fields to an owned task and refreshes `updated_at`,
/// all within one transaction. The owner column is never part of the SET
/// list. Returns `None` when the task is absent or not owned.
pub async fn update(
    pool: &PgPool,
    owner: i32,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<Option<Task>, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let current = match lock_owned(&mut tx, owner, id).await? {
        Some(task) => task,
        None => return Ok(None),
    };

    let title = title.map(str::trim).unwrap_or(&current.title);
    let description = description.or(current.description.as_deref());

    let sql = format!(
        "UPDATE tasks SET title = $2, description = $3, updated_at = $4 \
         WHERE id = $1 RETURNING {TASK_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;
    tx.commit().await.map_err(AppError::from)?;
    Ok(Some(updated))
}

/// Permanently removes an owned task. Returns `false` when the task is
/// absent or not owned.
pub async fn delete(pool: &PgPool, owner: i32, id: Uuid) -> Result<bool, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    if lock_owned(&mut tx, owner, id).await?.is_none() {
        return Ok(false);
    }

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;
    tx.commit().await.map_err(AppError::from)?;
    Ok(true)
}

/// Flips the completion flag and refreshes `updated_at` within one
/// transaction. Returns `None` when the task is absent or not owned.
pub async fn toggle_complete(pool: &PgPool, owner: i32, id: Uuid) -> Result<Option<Task>, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::from)?;
    let current = match lock_owned(&mut tx, owner, id).await? {
        Some(task) => task,
        None => return Ok(None),
    };

    let sql = format!(
        "UPDATE tasks SET is_complete = $2, updated_at = $3 \
         WHERE id = $1 RETURNING {TASK_COLUMNS}"
    );
    let updated = sqlx::query_as::<_, Task>(&sql)
        .bind(id)
        .bind(!current.is_complete)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from)?;
    tx.commit().await.map_err(AppError::from)?;
    Ok(Some(updated))
}
