use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full user row. The password hash stays inside the store and auth
/// layers; this type deliberately has no `Serialize` so it cannot end up in
/// a response body by accident.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user shape returned by the API: no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_carries_no_credential_material() {
        let now = Utc::now();
        let user = User {
            id: 1,
            email: "test@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            created_at: now,
            updated_at: now,
        };

        let response = UserResponse::from(user);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "test@example.com");
        assert!(json.get("password_hash").is_none());
    }
}
