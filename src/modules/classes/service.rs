use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::profiles::model::{Profile, ProfileInfo, Role};
use rollcall_core::errors::AppError;

use super::model::{Class, ClassDetailResponse, ClassSummary, CreateClassDto, UpdateClassDto};

const CLASS_COLUMNS: &str = "id, name, description, start_date, end_date, teacher_id, created_at";

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, class_id: Uuid) -> Result<Class, AppError> {
        sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(class_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Class not found"))
    }

    /// Load a class and verify the caller is its owning teacher. Every
    /// owner-gated operation across the modules funnels through here.
    #[instrument(skip(db, caller))]
    pub async fn get_owned(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
    ) -> Result<Class, AppError> {
        let class = Self::get_class(db, class_id).await?;

        if !caller.is_teacher() || class.teacher_id != caller.id {
            return Err(AppError::permission_denied(
                "Only the owning teacher can manage this class",
            ));
        }

        Ok(class)
    }

    #[instrument(skip(db, caller, dto), fields(teacher_id = %caller.id))]
    pub async fn create(
        db: &PgPool,
        caller: &Profile,
        dto: CreateClassDto,
    ) -> Result<Class, AppError> {
        if !caller.is_teacher() {
            return Err(AppError::permission_denied(
                "Only teachers can create classes",
            ));
        }

        if let (Some(start), Some(end)) = (dto.start_date, dto.end_date) {
            if start > end {
                return Err(AppError::validation("start_date must not be after end_date"));
            }
        }

        let class = sqlx::query_as::<_, Class>(&format!(
            "INSERT INTO classes (name, description, start_date, end_date, teacher_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(caller.id)
        .fetch_one(db)
        .await?;

        info!(class_id = %class.id, "class created");
        Ok(class)
    }

    #[instrument(skip(db, caller, dto))]
    pub async fn update(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let existing = Self::get_owned(db, caller, class_id).await?;

        let start = dto.start_date.or(existing.start_date);
        let end = dto.end_date.or(existing.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(AppError::validation("start_date must not be after end_date"));
            }
        }

        let class = sqlx::query_as::<_, Class>(&format!(
            "UPDATE classes
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 start_date = COALESCE($4, start_date),
                 end_date = COALESCE($5, end_date)
             WHERE id = $1
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(class_id)
        .bind(dto.name)
        .bind(dto.description)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .fetch_one(db)
        .await?;

        Ok(class)
    }

    /// Irreversible: roster rows, join requests, and attendance records go
    /// with the class via foreign-key cascade.
    #[instrument(skip(db, caller))]
    pub async fn delete(db: &PgPool, caller: &Profile, class_id: Uuid) -> Result<(), AppError> {
        Self::get_owned(db, caller, class_id).await?;

        sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(db)
            .await?;

        info!(class_id = %class_id, "class deleted");
        Ok(())
    }

    /// Class header plus roster. The roster is only included for the owning
    /// teacher and enrolled students; other callers get the header alone.
    #[instrument(skip(db, caller))]
    pub async fn detail(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
    ) -> Result<ClassDetailResponse, AppError> {
        let class = Self::get_summary(db, class_id).await?;

        let roster_visible = match caller.role {
            Role::Teacher => class.teacher_id == caller.id,
            Role::Student => Self::is_enrolled(db, class_id, caller.id).await?,
        };

        let roster = if roster_visible {
            Some(Self::roster(db, class_id).await?)
        } else {
            None
        };

        Ok(ClassDetailResponse { class, roster })
    }

    #[instrument(skip(db))]
    pub async fn get_summary(db: &PgPool, class_id: Uuid) -> Result<ClassSummary, AppError> {
        sqlx::query_as::<_, ClassSummary>(
            "SELECT c.id, c.name, c.description, c.start_date, c.end_date,
                    c.teacher_id, u.username AS teacher_name
             FROM classes c
             JOIN profiles p ON p.id = c.teacher_id
             JOIN users u ON u.id = p.user_id
             WHERE c.id = $1",
        )
        .bind(class_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Class not found"))
    }

    pub async fn is_enrolled(
        db: &PgPool,
        class_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, AppError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM class_students WHERE class_id = $1 AND student_id = $2",
        )
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        Ok(row.is_some())
    }

    pub async fn roster(db: &PgPool, class_id: Uuid) -> Result<Vec<ProfileInfo>, AppError> {
        let roster = sqlx::query_as::<_, ProfileInfo>(
            "SELECT p.id, u.username, p.role, p.bio, p.image_path
             FROM class_students cs
             JOIN profiles p ON p.id = cs.student_id
             JOIN users u ON u.id = p.user_id
             WHERE cs.class_id = $1
             ORDER BY u.username",
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(roster)
    }

    #[instrument(skip(db, caller))]
    pub async fn list_taught(db: &PgPool, caller: &Profile) -> Result<Vec<ClassSummary>, AppError> {
        if !caller.is_teacher() {
            return Err(AppError::permission_denied(
                "Only teachers have taught classes",
            ));
        }

        let classes = sqlx::query_as::<_, ClassSummary>(
            "SELECT c.id, c.name, c.description, c.start_date, c.end_date,
                    c.teacher_id, u.username AS teacher_name
             FROM classes c
             JOIN profiles p ON p.id = c.teacher_id
             JOIN users u ON u.id = p.user_id
             WHERE c.teacher_id = $1
             ORDER BY c.name",
        )
        .bind(caller.id)
        .fetch_all(db)
        .await?;

        Ok(classes)
    }

    #[instrument(skip(db, caller))]
    pub async fn list_enrolled(
        db: &PgPool,
        caller: &Profile,
    ) -> Result<Vec<ClassSummary>, AppError> {
        if !caller.is_student() {
            return Err(AppError::permission_denied(
                "Only students have enrolled classes",
            ));
        }

        let classes = sqlx::query_as::<_, ClassSummary>(
            "SELECT c.id, c.name, c.description, c.start_date, c.end_date,
                    c.teacher_id, u.username AS teacher_name
             FROM class_students cs
             JOIN classes c ON c.id = cs.class_id
             JOIN profiles p ON p.id = c.teacher_id
             JOIN users u ON u.id = p.user_id
             WHERE cs.student_id = $1
             ORDER BY c.name",
        )
        .bind(caller.id)
        .fetch_all(db)
        .await?;

        Ok(classes)
    }

    /// Name substring search; an empty or absent query lists every class.
    #[instrument(skip(db))]
    pub async fn search(db: &PgPool, query: Option<&str>) -> Result<Vec<ClassSummary>, AppError> {
        let pattern = match query {
            Some(q) if !q.trim().is_empty() => format!("%{}%", q.trim()),
            _ => "%".to_string(),
        };

        let classes = sqlx::query_as::<_, ClassSummary>(
            "SELECT c.id, c.name, c.description, c.start_date, c.end_date,
                    c.teacher_id, u.username AS teacher_name
             FROM classes c
             JOIN profiles p ON p.id = c.teacher_id
             JOIN users u ON u.id = p.user_id
             WHERE c.name ILIKE $1
             ORDER BY c.name",
        )
        .bind(pattern)
        .fetch_all(db)
        .await?;

        Ok(classes)
    }

    /// Direct enrollment by username. Idempotent: enrolling an already
    /// enrolled student reports it without error.
    #[instrument(skip(db, caller))]
    pub async fn add_student(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        username: &str,
    ) -> Result<String, AppError> {
        Self::get_owned(db, caller, class_id).await?;

        #[derive(sqlx::FromRow)]
        struct TargetRow {
            profile_id: Uuid,
            role: Role,
        }

        let target = sqlx::query_as::<_, TargetRow>(
            "SELECT p.id AS profile_id, p.role
             FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No user named {username}")))?;

        if target.role != Role::Student {
            return Err(AppError::wrong_role(format!(
                "{username} is not a Student"
            )));
        }

        let result = sqlx::query(
            "INSERT INTO class_students (class_id, student_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(class_id)
        .bind(target.profile_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            Ok(format!("{username} is already enrolled"))
        } else {
            info!(class_id = %class_id, student_id = %target.profile_id, "student enrolled");
            Ok(format!("Added {username} to the class"))
        }
    }

    /// Removing a student also clears any join request for the pair, so a
    /// later re-request starts from a clean slate.
    #[instrument(skip(db, caller))]
    pub async fn remove_student(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
        student_id: Uuid,
    ) -> Result<(), AppError> {
        Self::get_owned(db, caller, class_id).await?;

        if student_id == caller.id {
            return Err(AppError::invalid_state(
                "You cannot remove yourself from the class",
            ));
        }

        let mut tx = db.begin().await?;

        let result = sqlx::query(
            "DELETE FROM class_students WHERE class_id = $1 AND student_id = $2",
        )
        .bind(class_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Student is not enrolled in this class"));
        }

        sqlx::query("DELETE FROM join_requests WHERE class_id = $1 AND student_id = $2")
            .bind(class_id)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(class_id = %class_id, student_id = %student_id, "student removed");
        Ok(())
    }

    #[instrument(skip(db, caller))]
    pub async fn leave(db: &PgPool, caller: &Profile, class_id: Uuid) -> Result<String, AppError> {
        if !caller.is_student() {
            return Err(AppError::permission_denied("Only students can leave a class"));
        }

        let class = Self::get_class(db, class_id).await?;

        let result = sqlx::query(
            "DELETE FROM class_students WHERE class_id = $1 AND student_id = $2",
        )
        .bind(class_id)
        .bind(caller.id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::invalid_state(format!(
                "You are not enrolled in {}",
                class.name
            )));
        }

        Ok(format!("You left {}", class.name))
    }
}
