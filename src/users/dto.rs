use serde::{Deserialize, Serialize};

use super::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Client-facing view of a user; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub verified: bool,
    pub tracked_courses: Vec<i64>,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            verified: u.verified,
            tracked_courses: u.tracked_courses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            verified: false,
            tracked_courses: vec![5, 5],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn public_user_never_serializes_password_hash() {
        let public: PublicUser = sample_user().into();
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn user_row_skips_password_hash_too() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn tracked_list_serializes_in_order_with_duplicates() {
        let public: PublicUser = sample_user().into();
        let v: serde_json::Value = serde_json::to_value(&public).unwrap();
        assert_eq!(v["tracked_courses"], serde_json::json!([5, 5]));
        assert_eq!(v["verified"], serde_json::json!(false));
    }
}
