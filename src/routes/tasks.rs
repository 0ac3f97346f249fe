use crate::{
    auth::{check_owner, AuthenticatedUser},
    error::AppError,
    models::{CreateTask, TaskListResponse, UpdateTask},
    store,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Creates a task under the authenticated owner.
///
/// The `{owner}` path segment must normalize to the verified identity;
/// anything else reads as a nonexistent resource. The stored owner comes
/// from the token, never from the request body.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    payload: web::Json<CreateTask>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let owner = check_owner(&path, user.id())?;

    let task = store::tasks::create(&pool, owner, &payload.title, payload.description.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists the owner's tasks with a total count, in insertion order.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let owner = check_owner(&path, user.id())?;

    let tasks = store::tasks::list(&pool, owner).await?;
    let count = tasks.len();
    Ok(HttpResponse::Ok().json(TaskListResponse { tasks, count }))
}

/// Fetches a single owned task; 404 whether the id is unknown or the record
/// belongs to someone else.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (claimed_owner, id) = path.into_inner();
    let owner = check_owner(&claimed_owner, user.id())?;

    match store::tasks::find_owned(&**pool, owner, id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound),
    }
}

/// Updates title and/or description of an owned task; omitted fields keep
/// their values.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    payload: web::Json<UpdateTask>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let (claimed_owner, id) = path.into_inner();
    let owner = check_owner(&claimed_owner, user.id())?;

    let updated = store::tasks::update(
        &pool,
        owner,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
    )
    .await?;
    match updated {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound),
    }
}

/// Permanently removes an owned task.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (claimed_owner, id) = path.into_inner();
    let owner = check_owner(&claimed_owner, user.id())?;

    if store::tasks::delete(&pool, owner, id).await? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(AppError::NotFound)
    }
}

/// Flips the completion flag of an owned task.
#[patch("/{id}/complete")]
pub async fn toggle_complete(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (claimed_owner, id) = path.into_inner();
    let owner = check_owner(&claimed_owner, user.id())?;

    match store::tasks::toggle_complete(&pool, owner, id).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound),
    }
}
