use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Bcrypt only considers the first 72 bytes of its input. The truncation is
/// applied here explicitly, before hashing and before verification, so the
/// policy stays stable for existing stored hashes no matter what the backing
/// implementation does with longer input.
const BCRYPT_MAX_BYTES: usize = 72;

fn significant_bytes(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(BCRYPT_MAX_BYTES)]
}

/// Hashes a password with a randomized per-call salt; two calls on the same
/// input produce different blobs.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(significant_bytes(password), DEFAULT_COST).map_err(AppError::from)
}

/// Checks a password against a stored hash blob. A malformed blob is not an
/// error, it simply fails verification.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    verify(significant_bytes(password), hashed_password).unwrap_or(false)
}
