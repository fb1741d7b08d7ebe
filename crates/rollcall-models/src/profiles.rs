//! Profile domain models and DTOs.
//!
//! Every account has exactly one profile carrying its role and bio metadata.
//! The profile is created in the same transaction as the account during
//! registration and is only ever mutated by its owner.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::attendance::AttendanceRecordInfo;

/// The role a profile holds. Assigned at registration and not re-validated
/// afterward: a class keeps its owner even if roles were ever migrated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "profile_role")]
pub enum Role {
    Teacher,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Teacher => write!(f, "Teacher"),
            Role::Student => write!(f, "Student"),
        }
    }
}

/// A profile row as stored in the database.
///
/// Services receive the caller's `Profile` explicitly on every operation;
/// there is no ambient current-user state below the HTTP layer.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
    pub bio: String,
    pub image_path: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Profile {
    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

/// A profile joined with its account's username, the shape the API returns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileInfo {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub bio: String,
    pub image_path: Option<String>,
}

/// DTO for updating one's own profile. Only bio and image reference are
/// owner-mutable; the role is fixed at registration.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(length(max = 255))]
    pub image_path: Option<String>,
}

/// Profile detail with the student's attendance history and overall
/// absence rate.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileDetailResponse {
    pub profile: ProfileInfo,
    pub records: Vec<AttendanceRecordInfo>,
    pub total_records: i64,
    pub total_absences: i64,
    /// Share of records marked Absent, in percent.
    pub absence_rate: f64,
}

/// Per-class presence rate for one enrolled class. Presence rate is a
/// distinct metric from the absence rate shown on the profile detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassAttendanceSummary {
    pub class_id: Uuid,
    pub class_name: String,
    pub total_records: i64,
    pub present_count: i64,
    /// Share of records marked Present, in percent.
    pub presence_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileSummaryResponse {
    pub profile: ProfileInfo,
    pub classes: Vec<ClassAttendanceSummary>,
}
