use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::attendance::model::{
    AttendanceQuery, AttendanceRecord, AttendanceRecordInfo, MarkAttendanceBatchDto,
    MarkAttendanceDto, OwnAttendanceResponse, UnmarkedDatesQuery, UnmarkedDatesResponse,
};
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use rollcall_core::errors::AppError;

#[utoipa::path(
    put,
    path = "/api/classes/{class_id}/attendance",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    request_body = MarkAttendanceDto,
    responses(
        (status = 200, description = "Record written (insert or overwrite)", body = AttendanceRecord),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Student not enrolled", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceDto>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let record = AttendanceService::mark(&state.db, &caller, class_id, dto).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/attendance/batch",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    request_body = MarkAttendanceBatchDto,
    responses(
        (status = 200, description = "All entries written", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 422, description = "One or more entries invalid; nothing written", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, dto))]
pub async fn mark_attendance_batch(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<MarkAttendanceBatchDto>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let records = AttendanceService::mark_batch(&state.db, &caller, class_id, dto).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}/attendance",
    params(("class_id" = Uuid, Path, description = "Class ID"), AttendanceQuery),
    responses(
        (status = 200, description = "Class attendance records", body = [AttendanceRecordInfo]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, query))]
pub async fn list_class_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecordInfo>>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let records = AttendanceService::list_class(&state.db, &caller, class_id, query).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}/students/{profile_id}/unmarked-dates",
    params(
        ("class_id" = Uuid, Path, description = "Class ID"),
        ("profile_id" = Uuid, Path, description = "Student profile ID"),
        UnmarkedDatesQuery
    ),
    responses(
        (status = 200, description = "Calendar days without a record, ascending", body = UnmarkedDatesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Class has no start date", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, query))]
pub async fn list_unmarked_dates(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((class_id, profile_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<UnmarkedDatesQuery>,
) -> Result<Json<UnmarkedDatesResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let response =
        AttendanceService::unmarked(&state.db, &caller, class_id, profile_id, as_of).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/attendance/me",
    responses(
        (status = 200, description = "Own attendance history with absence rate", body = OwnAttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn list_own_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<OwnAttendanceResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let response = AttendanceService::list_own(&state.db, &caller).await?;
    Ok(Json(response))
}
