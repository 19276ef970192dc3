use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for account registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, letters, digits, `_`, `.` or `-`).
    #[schema(example = "maria.lopez")]
    pub username: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_username(username: &str) -> Result<(), AppError> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-'".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_username(&payload.username)?;
    validate_password(&payload.password)
}

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "maria.lopez")]
    pub username: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "maria.lopez")]
    pub username: String,
    /// Role assigned to the new account. Always `viewer`.
    #[schema(example = "viewer")]
    pub role: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token valid for 7 days.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "maria.lopez")]
    pub username: String,
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["content:manage", "media:manage"]))]
    pub permissions: Vec<String>,
}

/// Current authenticated user's profile, as carried by the token.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "maria.lopez")]
    pub username: String,
    #[schema(example = "editor")]
    pub role: String,
    #[schema(example = json!(["content:manage", "media:manage"]))]
    pub permissions: Vec<String>,
}

/// An account as listed in the admin panel.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Request body for changing an account's role.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRoleRequest {
    /// One of the seeded roles: `admin`, `editor`, `viewer`.
    #[schema(example = "editor")]
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn register_accepts_dotted_usernames() {
        assert!(validate_register_request(&register("maria.lopez", "password1")).is_ok());
        assert!(validate_register_request(&register("ana-b_2", "password1")).is_ok());
    }

    #[test]
    fn register_rejects_bad_usernames() {
        assert!(validate_register_request(&register("", "password1")).is_err());
        assert!(validate_register_request(&register("con espacio", "password1")).is_err());
        assert!(validate_register_request(&register(&"a".repeat(33), "password1")).is_err());
    }

    #[test]
    fn register_rejects_short_password() {
        assert!(validate_register_request(&register("maria", "short")).is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        let empty_user = LoginRequest {
            username: "  ".into(),
            password: "x".into(),
        };
        assert!(validate_login_request(&empty_user).is_err());
        let empty_pass = LoginRequest {
            username: "maria".into(),
            password: String::new(),
        };
        assert!(validate_login_request(&empty_pass).is_err());
    }
}
