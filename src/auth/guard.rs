use crate::error::AppError;

/// Reconciles the owner identity claimed in the request path with the
/// verified identity from the token.
///
/// The claimed identity arrives as an opaque path segment and is normalized
/// to the canonical numeric form before the exact comparison. A mismatch and
/// a segment that cannot be normalized both collapse into `NotFound`, the
/// same response a genuinely nonexistent resource produces, so a caller can
/// never learn that a resource exists under someone else's identity. This
/// runs before any store access and performs no queries.
pub fn check_owner(path_owner: &str, verified: i32) -> Result<i32, AppError> {
    match path_owner.parse::<i32>() {
        Ok(claimed) if claimed == verified => Ok(verified),
        _ => Err(AppError::NotFound),
    }
}
