use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::classes::service::ClassService;
use crate::modules::profiles::model::Profile;
use rollcall_core::errors::AppError;

use super::model::{JoinDecision, JoinRequest, JoinRequestInfo, JoinStatus};

const REQUEST_COLUMNS: &str = "id, class_id, student_id, status, created_at";

pub struct JoinRequestService;

impl JoinRequestService {
    /// Send a join request for a class.
    ///
    /// An existing Pending request is returned as-is (informational no-op).
    /// An existing decided request is deleted and replaced with a fresh
    /// Pending one, so students can re-request after a rejection.
    #[instrument(skip(db, caller), fields(student_id = %caller.id))]
    pub async fn send(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
    ) -> Result<JoinRequest, AppError> {
        if !caller.is_student() {
            return Err(AppError::permission_denied(
                "Only students can request to join a class",
            ));
        }

        ClassService::get_class(db, class_id).await?;

        if ClassService::is_enrolled(db, class_id, caller.id).await? {
            return Err(AppError::invalid_state(
                "You are already enrolled in this class",
            ));
        }

        let existing = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests
             WHERE class_id = $1 AND student_id = $2"
        ))
        .bind(class_id)
        .bind(caller.id)
        .fetch_optional(db)
        .await?;

        if let Some(request) = existing {
            if request.status == JoinStatus::Pending {
                return Ok(request);
            }

            // Decided request: replace it with a fresh Pending one.
            let mut tx = db.begin().await?;

            sqlx::query("DELETE FROM join_requests WHERE id = $1")
                .bind(request.id)
                .execute(&mut *tx)
                .await?;

            let fresh = sqlx::query_as::<_, JoinRequest>(&format!(
                "INSERT INTO join_requests (class_id, student_id)
                 VALUES ($1, $2)
                 RETURNING {REQUEST_COLUMNS}"
            ))
            .bind(class_id)
            .bind(caller.id)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            info!(request_id = %fresh.id, "join request re-sent");
            return Ok(fresh);
        }

        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "INSERT INTO join_requests (class_id, student_id)
             VALUES ($1, $2)
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(class_id)
        .bind(caller.id)
        .fetch_one(db)
        .await?;

        info!(request_id = %request.id, "join request sent");
        Ok(request)
    }

    #[instrument(skip(db, caller))]
    pub async fn list_pending(
        db: &PgPool,
        caller: &Profile,
        class_id: Uuid,
    ) -> Result<Vec<JoinRequestInfo>, AppError> {
        ClassService::get_owned(db, caller, class_id).await?;

        let requests = sqlx::query_as::<_, JoinRequestInfo>(
            "SELECT jr.id, jr.class_id, c.name AS class_name, jr.student_id,
                    u.username AS student_username, jr.status, jr.created_at
             FROM join_requests jr
             JOIN classes c ON c.id = jr.class_id
             JOIN profiles p ON p.id = jr.student_id
             JOIN users u ON u.id = p.user_id
             WHERE jr.class_id = $1 AND jr.status = 'Pending'
             ORDER BY jr.created_at",
        )
        .bind(class_id)
        .fetch_all(db)
        .await?;

        Ok(requests)
    }

    /// Approve or reject a Pending request. Approval also inserts the roster
    /// row in the same transaction; rejection leaves the roster unchanged.
    /// Deciding an already-decided request is an invalid state transition.
    #[instrument(skip(db, caller))]
    pub async fn decide(
        db: &PgPool,
        caller: &Profile,
        request_id: Uuid,
        action: JoinDecision,
    ) -> Result<JoinRequest, AppError> {
        let request = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Join request not found"))?;

        ClassService::get_owned(db, caller, request.class_id).await?;

        if request.status != JoinStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Join request is already {}",
                request.status
            )));
        }

        let new_status = match action {
            JoinDecision::Approve => JoinStatus::Approved,
            JoinDecision::Reject => JoinStatus::Rejected,
        };

        let mut tx = db.begin().await?;

        let updated = sqlx::query_as::<_, JoinRequest>(&format!(
            "UPDATE join_requests SET status = $2 WHERE id = $1
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request_id)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        if action == JoinDecision::Approve {
            sqlx::query(
                "INSERT INTO class_students (class_id, student_id)
                 VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(request.class_id)
            .bind(request.student_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            request_id = %request_id,
            status = %updated.status,
            "join request decided"
        );
        Ok(updated)
    }
}
