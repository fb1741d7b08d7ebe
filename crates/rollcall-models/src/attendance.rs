//! Attendance ledger models and marking DTOs.
//!
//! One record per (class, student, date), written only by the owning teacher.
//! The canonical status set is the 4-code one: P, A, L, E.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Attendance status codes as stored and serialized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    #[sqlx(rename = "P")]
    Present,
    #[serde(rename = "A")]
    #[sqlx(rename = "A")]
    Absent,
    #[serde(rename = "L")]
    #[sqlx(rename = "L")]
    Late,
    #[serde(rename = "E")]
    #[sqlx(rename = "E")]
    Excused,
}

impl AttendanceStatus {
    pub fn description(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// An attendance record joined with student and class names, for listings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AttendanceRecordInfo {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_name: String,
    pub student_id: Uuid,
    pub student_username: String,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub reason: String,
}

/// DTO for marking a single (student, date) cell. Upsert semantics: an
/// existing record for the same key is overwritten.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceDto {
    pub student_id: Uuid,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct BatchAttendanceEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// DTO for marking a whole roster on one date. Validation is all-or-nothing:
/// a single bad entry fails the batch before anything is written.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceBatchDto {
    pub date: chrono::NaiveDate,
    #[validate(length(min = 1), nested)]
    pub entries: Vec<BatchAttendanceEntry>,
}

/// Filters for the teacher's class attendance listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    pub date: Option<chrono::NaiveDate>,
    pub student_id: Option<Uuid>,
}

/// `as_of` defaults to today when absent.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UnmarkedDatesQuery {
    pub as_of: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnmarkedDatesResponse {
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub as_of: chrono::NaiveDate,
    pub unmarked_dates: Vec<chrono::NaiveDate>,
}

/// A student's own attendance history with the overall absence rate and
/// warning flag.
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnAttendanceResponse {
    pub records: Vec<AttendanceRecordInfo>,
    pub total_records: i64,
    pub total_absences: i64,
    pub absence_rate: f64,
    pub warning: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_single_letter_code() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"P\""
        );
        assert_eq!(
            serde_json::from_str::<AttendanceStatus>("\"E\"").unwrap(),
            AttendanceStatus::Excused
        );
        assert!(serde_json::from_str::<AttendanceStatus>("\"Present\"").is_err());
    }

    #[test]
    fn status_descriptions() {
        assert_eq!(AttendanceStatus::Absent.description(), "Absent");
        assert_eq!(AttendanceStatus::Late.description(), "Late");
    }

    #[test]
    fn mark_attendance_dto_rejects_oversized_reason() {
        let dto = MarkAttendanceDto {
            student_id: Uuid::new_v4(),
            date: "2024-01-03".parse().unwrap(),
            status: AttendanceStatus::Absent,
            reason: Some("x".repeat(501)),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn batch_dto_rejects_empty_entries() {
        let dto = MarkAttendanceBatchDto {
            date: "2024-01-03".parse().unwrap(),
            entries: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn batch_dto_validates_nested_entries() {
        let dto = MarkAttendanceBatchDto {
            date: "2024-01-03".parse().unwrap(),
            entries: vec![BatchAttendanceEntry {
                student_id: Uuid::new_v4(),
                status: AttendanceStatus::Late,
                reason: Some("x".repeat(501)),
            }],
        };
        assert!(dto.validate().is_err());
    }
}
