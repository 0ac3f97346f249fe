use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Longest accepted task title, counted in characters after trimming.
pub const TITLE_MAX_CHARS: usize = 255;

/// A task record as stored and as returned by the API.
///
/// `user_id` is set once at creation and is not alterable through any update
/// path; every lookup filters on it together with `id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(custom = "validate_title")]
    pub title: String,
    pub description: Option<String>,
}

/// Payload for updating a task: only supplied fields change. The owner is
/// not part of this shape on purpose.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(custom = "validate_title")]
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Response of the list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub count: usize,
}

/// A title must still contain something after trimming, and fit in 255
/// characters.
fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        let mut error = ValidationError::new("length");
        error.message = Some("Title is required".into());
        return Err(error);
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let mut error = ValidationError::new("length");
        error.message = Some("Title must be 255 characters or less".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_title_boundaries() {
        let at_limit = CreateTask {
            title: "a".repeat(255),
            description: None,
        };
        assert!(at_limit.validate().is_ok());

        let over_limit = CreateTask {
            title: "a".repeat(256),
            description: None,
        };
        assert!(over_limit.validate().is_err());

        let empty = CreateTask {
            title: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let whitespace_only = CreateTask {
            title: "   \t  ".to_string(),
            description: None,
        };
        assert!(whitespace_only.validate().is_err());
    }

    #[test]
    fn test_title_limit_applies_after_trimming() {
        // 255 significant characters plus surrounding whitespace still fits.
        let padded = CreateTask {
            title: format!("  {}  ", "a".repeat(255)),
            description: Some("desc".to_string()),
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_update_task_title_is_optional() {
        let untouched = UpdateTask {
            title: None,
            description: Some("new description".to_string()),
        };
        assert!(untouched.validate().is_ok());

        let blank = UpdateTask {
            title: Some("  ".to_string()),
            description: None,
        };
        assert!(blank.validate().is_err());

        let valid = UpdateTask {
            title: Some("New title".to_string()),
            description: None,
        };
        assert!(valid.validate().is_ok());
    }
}
