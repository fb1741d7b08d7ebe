use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{AttendanceRecordInfo, AttendanceStatus};
use rollcall_core::errors::AppError;
use rollcall_core::reporting::{absence_rate, presence_rate};

use super::model::{
    ClassAttendanceSummary, Profile, ProfileDetailResponse, ProfileInfo, ProfileSummaryResponse,
    UpdateProfileDto,
};

pub struct ProfileService;

impl ProfileService {
    /// Resolve the authenticated caller's stored profile. Controllers call
    /// this once per request and hand the result to the domain services.
    #[instrument(skip(db))]
    pub async fn get_by_user_id(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, user_id, role, bio, image_path, created_at, updated_at
             FROM profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))
    }

    #[instrument(skip(db))]
    pub async fn get_info(db: &PgPool, profile_id: Uuid) -> Result<ProfileInfo, AppError> {
        sqlx::query_as::<_, ProfileInfo>(
            "SELECT p.id, u.username, p.role, p.bio, p.image_path
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.id = $1",
        )
        .bind(profile_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))
    }

    /// Only bio and image reference are mutable, and only by the owner;
    /// callers are routed here through their own token so no further
    /// ownership check is needed.
    #[instrument(skip(db, dto))]
    pub async fn update_own(
        db: &PgPool,
        caller: &Profile,
        dto: UpdateProfileDto,
    ) -> Result<ProfileInfo, AppError> {
        sqlx::query(
            "UPDATE profiles
             SET bio = COALESCE($2, bio),
                 image_path = COALESCE($3, image_path),
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(caller.id)
        .bind(dto.bio)
        .bind(dto.image_path)
        .execute(db)
        .await?;

        Self::get_info(db, caller.id).await
    }

    /// Profile with attendance history and the overall absence rate. The
    /// records list is empty for teacher profiles.
    #[instrument(skip(db))]
    pub async fn detail(db: &PgPool, profile_id: Uuid) -> Result<ProfileDetailResponse, AppError> {
        let profile = Self::get_info(db, profile_id).await?;

        let records = sqlx::query_as::<_, AttendanceRecordInfo>(
            "SELECT a.id, a.class_id, c.name AS class_name, a.student_id,
                    u.username AS student_username, a.date, a.status, a.reason
             FROM attendance_records a
             JOIN classes c ON c.id = a.class_id
             JOIN profiles p ON p.id = a.student_id
             JOIN users u ON u.id = p.user_id
             WHERE a.student_id = $1
             ORDER BY a.date DESC",
        )
        .bind(profile_id)
        .fetch_all(db)
        .await?;

        let total_records = records.len() as i64;
        let total_absences = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Absent)
            .count() as i64;

        Ok(ProfileDetailResponse {
            profile,
            records,
            total_records,
            total_absences,
            absence_rate: absence_rate(total_absences as u64, total_records as u64),
        })
    }

    /// Per-class presence rates for every class the student is enrolled in.
    /// Presence rate, not absence rate: the two are distinct metrics.
    #[instrument(skip(db))]
    pub async fn summary(db: &PgPool, profile_id: Uuid) -> Result<ProfileSummaryResponse, AppError> {
        let profile = Self::get_info(db, profile_id).await?;

        #[derive(sqlx::FromRow)]
        struct ClassCounts {
            class_id: Uuid,
            class_name: String,
            total: i64,
            present: i64,
        }

        let counts = sqlx::query_as::<_, ClassCounts>(
            "SELECT c.id AS class_id, c.name AS class_name,
                    COUNT(a.id) AS total,
                    COUNT(a.id) FILTER (WHERE a.status = 'P') AS present
             FROM class_students cs
             JOIN classes c ON c.id = cs.class_id
             LEFT JOIN attendance_records a
               ON a.class_id = cs.class_id AND a.student_id = cs.student_id
             WHERE cs.student_id = $1
             GROUP BY c.id, c.name
             ORDER BY c.name",
        )
        .bind(profile_id)
        .fetch_all(db)
        .await?;

        let classes = counts
            .into_iter()
            .map(|c| ClassAttendanceSummary {
                class_id: c.class_id,
                class_name: c.class_name,
                total_records: c.total,
                present_count: c.present,
                presence_rate: presence_rate(c.present as u64, c.total as u64),
            })
            .collect();

        Ok(ProfileSummaryResponse { profile, classes })
    }
}
