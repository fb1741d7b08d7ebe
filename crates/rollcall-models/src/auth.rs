//! Authentication models: registration, login, and JWT claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::profiles::{ProfileInfo, Role};

/// JWT claims carried by every access token. The role is embedded so the
/// role-gate middleware can run without a database round trip; ownership
/// checks always go through the caller's stored profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// DTO for account registration. Creating the account also creates its
/// profile in the same transaction.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Returned by both registration (auto-login) and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub profile: ProfileInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            username: "amina".to_string(),
            email: "amina@example.com".to_string(),
            password: "password123".to_string(),
            role: Role::Student,
        }
    }

    #[test]
    fn register_request_valid() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn register_request_rejects_invalid_email() {
        let mut dto = valid_register();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let mut dto = valid_register();
        dto.password = "short".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_username() {
        let mut dto = valid_register();
        dto.username = "ab".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn login_request_rejects_empty_fields() {
        let dto = LoginRequest {
            username: "".to_string(),
            password: "".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
