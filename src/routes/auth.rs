use crate::{
    auth::{
        hash_password, verify_password, AuthResponse, AuthenticatedUser, SigninRequest,
        SignupRequest, TokenKeys, VerifyResponse,
    },
    error::AppError,
    models::UserResponse,
    store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new account.
///
/// A duplicate email produces the same generic conflict no matter whether it
/// was caught by the pre-check or by the unique index, so the response never
/// confirms that an address is registered.
#[post("/signup")]
pub async fn signup(
    pool: web::Data<PgPool>,
    keys: web::Data<TokenKeys>,
    payload: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    if store::users::find_by_email(&pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict);
    }

    let password_hash = hash_password(&payload.password)?;
    let user = store::users::insert(&pool, &payload.email, &password_hash).await?;
    let token = keys.issue(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

/// Sign in an existing account.
///
/// Unknown email and wrong password end in the identical response.
#[post("/signin")]
pub async fn signin(
    pool: web::Data<PgPool>,
    keys: web::Data<TokenKeys>,
    payload: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let user = store::users::find_by_email(&pool, &payload.email).await?;
    match user {
        Some(user) if verify_password(&payload.password, &user.password_hash) => {
            let token = keys.issue(user.id)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                user: UserResponse::from(user),
                token,
            }))
        }
        _ => Err(AppError::Unauthorized),
    }
}

/// Current authenticated user. A token whose subject no longer exists (e.g.
/// a deleted account) is as invalid as any other bad token.
#[get("/me")]
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    match store::users::find_by_id(&pool, user.id()).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        None => Err(AppError::Unauthorized),
    }
}

/// Reports that the presented token is valid and for whom. Reaching this
/// handler at all means the middleware already verified it.
#[get("/verify")]
pub async fn verify(user: AuthenticatedUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(VerifyResponse {
        valid: true,
        user_id: user.id(),
    }))
}
