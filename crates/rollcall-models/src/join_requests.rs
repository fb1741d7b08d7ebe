//! Join-request workflow models.
//!
//! A join request mediates student-initiated enrollment: Pending until the
//! owning teacher approves or rejects it. Decided requests are terminal;
//! re-requesting deletes the decided row and creates a fresh Pending one.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "join_request_status")]
pub enum JoinStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for JoinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinStatus::Pending => write!(f, "Pending"),
            JoinStatus::Approved => write!(f, "Approved"),
            JoinStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct JoinRequest {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub status: JoinStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A join request joined with requester and class names, for the teacher's
/// pending list.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct JoinRequestInfo {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_name: String,
    pub student_id: Uuid,
    pub student_username: String,
    pub status: JoinStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JoinDecision {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideJoinRequestDto {
    pub action: JoinDecision,
}
