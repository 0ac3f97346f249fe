pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use guard::check_owner;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Payload for a new account registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address for the new account.
    #[validate(email)]
    pub email: String,
    /// Password for the new account, 8 to 128 characters. Only the first 72
    /// bytes are significant to the credential verifier.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Payload for a signin request. The password gets no length constraint
/// here: any mismatch ends in the same generic 401 anyway.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Response after successful signup or signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Response of `GET /auth/verify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user_id: i32,
}
