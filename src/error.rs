//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. Responses are deliberately coarse: the client sees one fixed
//! body per error class, while the underlying cause is kept to the server
//! logs. Authentication failures all render the same 401, and ownership
//! failures render the same 404 as a genuinely missing record, so responses
//! cannot be used to probe which accounts or tasks exist.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can
//! return it directly, and provides `From` conversions for `sqlx::Error`,
//! `validator::ValidationErrors`, and `bcrypt::BcryptError` for use with `?`.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Postgres error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug)]
pub enum AppError {
    /// Authentication failure (HTTP 401). One variant for every cause:
    /// missing header, malformed scheme, bad signature, expired token,
    /// unknown subject, wrong credentials.
    Unauthorized,
    /// Resource absent or owned by someone else (HTTP 404). The two cases
    /// are indistinguishable on purpose.
    NotFound,
    /// Write conflict, e.g. duplicate registration (HTTP 409). Carries no
    /// hint about what conflicted.
    Conflict,
    /// Malformed input (HTTP 400). Field-level detail is safe to expose.
    Validation(String),
    /// Unexpected server-side failure (HTTP 500). The detail goes to the
    /// logs, never to the client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "authentication failed"),
            AppError::NotFound => write!(f, "resource not found"),
            AppError::Conflict => write!(f, "write conflict"),
            AppError::Validation(details) => write!(f, "validation failed: {}", details),
            AppError::Internal(detail) => write!(f, "internal error: {}", detail),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => HttpResponse::Unauthorized().json(json!({
                "error": "Authentication failed"
            })),
            AppError::NotFound => HttpResponse::NotFound().json(json!({
                "error": "Not found"
            })),
            AppError::Conflict => HttpResponse::Conflict().json(json!({
                "error": "Registration failed"
            })),
            AppError::Validation(details) => HttpResponse::BadRequest().json(json!({
                "error": "Validation failed",
                "details": details
            })),
            AppError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, a unique constraint violation maps to
/// the generic `Conflict` (covers the race where two registrations with the
/// same email pass the pre-check simultaneously), and everything else is an
/// internal error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                AppError::Conflict
            }
            _ => AppError::Internal(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password hashing failed: {}", error))
    }
}
