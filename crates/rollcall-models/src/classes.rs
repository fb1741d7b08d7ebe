//! Class domain models and DTOs.
//!
//! A class is a named course section owned by exactly one teacher profile,
//! with a many-to-many roster of student profiles and optional start/end
//! date bounds used by the attendance calendar.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::profiles::ProfileInfo;

/// A class row as stored in the database.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub teacher_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A class joined with its teacher's username, the shape list endpoints
/// return.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
}

/// Class detail. The roster is only present when the caller is the owning
/// teacher or an enrolled student; other students see the header alone.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassDetailResponse {
    pub class: ClassSummary,
    pub roster: Option<Vec<ProfileInfo>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// All fields optional; only provided fields are updated.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

/// DTO for direct enrollment by the owning teacher.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddStudentDto {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
}

/// Query parameters for class search. An absent or empty query lists all
/// classes.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassSearchParams {
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_class_dto_valid() {
        let dto = CreateClassDto {
            name: "Algebra I".to_string(),
            description: "Introductory algebra".to_string(),
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-06-30".parse().unwrap()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn create_class_dto_rejects_empty_name() {
        let dto = CreateClassDto {
            name: "".to_string(),
            description: "Introductory algebra".to_string(),
            start_date: None,
            end_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn create_class_dto_rejects_long_name() {
        let dto = CreateClassDto {
            name: "x".repeat(101),
            description: "d".to_string(),
            start_date: None,
            end_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn update_class_dto_accepts_empty_update() {
        let dto = UpdateClassDto {
            name: None,
            description: None,
            start_date: None,
            end_date: None,
        };
        assert!(dto.validate().is_ok());
    }
}
