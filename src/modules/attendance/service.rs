use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::classes::service::ClassService;
use crate::modules::profiles::model::Profile;
use crate::modules::profiles::service::ProfileService;
use rollcall_core::errors::AppError;
use rollcall_core::reporting::{absence_rate, absence_warning, unmarked_dates};

use super::model::{
    AttendanceQuery, AttendanceRecord, AttendanceRecordInfo, AttendanceStatus,
    MarkAttendanceBatchDto, MarkAttendanceDto, OwnAttendanceResponse, UnmarkedDatesResponse,
};

const UPSERT_RECORD: &str = "INSERT INTO attendance_records (class_id, student_id, date, status, reason)
     VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (class_id, student_id, date)
     DO UPDATE SET status = EXCLUDED.status, reason = EXCLUDED.reason, updated_at = now()
     RETURNING id, class_id, student_id, date, status, reason, created_at, updated_at";

pub struct AttendanceService;

impl AttendanceService {
    /// Mark one (student, date) cell. Upsert: re-marking an already recorded
    /// day overwrites status and reason.
    #[instrument(skip(db, caller, dto))]
    pub async fn mark(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        dto: MarkAttendanceDto,
    ) -> Result<AttendanceRecord, AppError> {
        ClassService::get_owned(db, caller, class_id).await?;

        if !ClassService::is_enrolled(db, class_id, dto.student_id).await? {
            return Err(AppError::invalid_state(
                "Student is not enrolled in this class",
            ));
        }

        let record = sqlx::query_as::<_, AttendanceRecord>(UPSERT_RECORD)
            .bind(class_id)
            .bind(dto.student_id)
            .bind(dto.date)
            .bind(dto.status)
            .bind(dto.reason.unwrap_or_default())
            .fetch_one(db)
            .await?;

        info!(
            class_id = %class_id,
            student_id = %record.student_id,
            date = %record.date,
            "attendance marked"
        );
        Ok(record)
    }

    /// Mark a whole roster for one date. Validation is all-or-nothing: every
    /// entry must reference a distinct, enrolled student before anything is
    /// written, and the writes share one transaction.
    #[instrument(skip(db, caller, dto), fields(entries = dto.entries.len()))]
    pub async fn mark_batch(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        dto: MarkAttendanceBatchDto,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        ClassService::get_owned(db, caller, class_id).await?;

        let roster: HashSet<Uuid> = ClassService::roster(db, class_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let mut seen = HashSet::new();
        let mut bad_entries = Vec::new();
        for (index, entry) in dto.entries.iter().enumerate() {
            if !roster.contains(&entry.student_id) || !seen.insert(entry.student_id) {
                bad_entries.push(index.to_string());
            }
        }

        if !bad_entries.is_empty() {
            return Err(AppError::validation(format!(
                "Entries {} reference students not enrolled in this class or duplicated in the batch; nothing was recorded",
                bad_entries.join(", ")
            )));
        }

        let mut tx = db.begin().await?;
        let mut records = Vec::with_capacity(dto.entries.len());

        for entry in dto.entries {
            let record = sqlx::query_as::<_, AttendanceRecord>(UPSERT_RECORD)
                .bind(class_id)
                .bind(entry.student_id)
                .bind(dto.date)
                .bind(entry.status)
                .bind(entry.reason.unwrap_or_default())
                .fetch_one(&mut *tx)
                .await?;
            records.push(record);
        }

        tx.commit().await?;

        info!(
            class_id = %class_id,
            date = %dto.date,
            count = records.len(),
            "attendance marked for batch"
        );
        Ok(records)
    }

    #[instrument(skip(db, caller, query))]
    pub async fn list_class(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        query: AttendanceQuery,
    ) -> Result<Vec<AttendanceRecordInfo>, AppError> {
        ClassService::get_owned(db, caller, class_id).await?;

        let records = sqlx::query_as::<_, AttendanceRecordInfo>(
            "SELECT a.id, a.class_id, c.name AS class_name, a.student_id,
                    u.username AS student_username, a.date, a.status, a.reason
             FROM attendance_records a
             JOIN classes c ON c.id = a.class_id
             JOIN profiles p ON p.id = a.student_id
             JOIN users u ON u.id = p.user_id
             WHERE a.class_id = $1
               AND ($2::date IS NULL OR a.date = $2)
               AND ($3::uuid IS NULL OR a.student_id = $3)
             ORDER BY a.date DESC, u.username",
        )
        .bind(class_id)
        .bind(query.date)
        .bind(query.student_id)
        .fetch_all(db)
        .await?;

        Ok(records)
    }

    /// A student's own history, newest first, with the overall absence rate
    /// and the warning flag (strictly above 25%).
    #[instrument(skip(db, caller), fields(student_id = %caller.id))]
    pub async fn list_own(db: &PgPool, caller: &Profile) -> Result<OwnAttendanceResponse, AppError> {
        if !caller.is_student() {
            return Err(AppError::permission_denied(
                "Only students have their own attendance history",
            ));
        }

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
        .bind(caller.id)
        .fetch_all(db)
        .await?;

        let total_records = records.len() as i64;
        let total_absences = records
            .iter()
            .filter(|r| r.status == AttendanceStatus::Absent)
            .count() as i64;
        let rate = absence_rate(total_absences as u64, total_records as u64);

        Ok(OwnAttendanceResponse {
            records,
            total_records,
            total_absences,
            absence_rate: rate,
            warning: absence_warning(rate),
        })
    }

    /// Days in the class calendar that have no record yet for one student.
    /// The calendar needs a start date; without one the range is undefined.
    #[instrument(skip(db, caller))]
    pub async fn unmarked(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        student_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<UnmarkedDatesResponse, AppError> {
        let class = ClassService::get_owned(db, caller, class_id).await?;
        ProfileService::get_info(db, student_id).await?;

        let start = class.start_date.ok_or_else(|| {
            AppError::invalid_state("Class has no start date; attendance calendar is undefined")
        })?;

        let marked: HashSet<NaiveDate> = sqlx::query_as::<_, (NaiveDate,)>(
            "SELECT date FROM attendance_records WHERE class_id = $1 AND student_id = $2",
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|(date,)| date)
        .collect();

        Ok(UnmarkedDatesResponse {
            class_id,
            student_id,
            as_of,
            unmarked_dates: unmarked_dates(start, class.end_date, as_of, &marked),
        })
    }
}
