use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::classes::model::{
    AddStudentDto, Class, ClassDetailResponse, ClassSearchParams, ClassSummary, CreateClassDto,
    UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use rollcall_core::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 200, description = "Class created", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teachers only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<Json<Class>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let class = ClassService::create(&state.db, &caller, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    get,
    path = "/api/classes/search",
    params(ClassSearchParams),
    responses(
        (status = 200, description = "Matching classes", body = [ClassSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn search_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<ClassSearchParams>,
) -> Result<Json<Vec<ClassSummary>>, AppError> {
    ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let classes = ClassService::search(&state.db, params.query.as_deref()).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/taught",
    responses(
        (status = 200, description = "Classes owned by the calling teacher", body = [ClassSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teachers only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn list_taught_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ClassSummary>>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let classes = ClassService::list_taught(&state.db, &caller).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/enrolled",
    responses(
        (status = 200, description = "Classes the calling student is enrolled in", body = [ClassSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Students only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn list_enrolled_classes(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<ClassSummary>>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let classes = ClassService::list_enrolled(&state.db, &caller).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class detail", body = ClassDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class_detail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassDetailResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let detail = ClassService::detail(&state.db, &caller, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    put,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let class = ClassService::update(&state.db, &caller, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{class_id}",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    ClassService::delete(&state.db, &caller, id).await?;
    Ok(Json(json!({"message": "Class deleted"})))
}

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/students",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    request_body = AddStudentDto,
    responses(
        (status = 200, description = "Student enrolled (or already enrolled)", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse),
        (status = 409, description = "Target is not a Student", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn add_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AddStudentDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let message = ClassService::add_student(&state.db, &caller, id, &dto.username).await?;
    Ok(Json(MessageResponse { message }))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{class_id}/students/{profile_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class ID"),
        ("profile_id" = Uuid, Path, description = "Student profile ID")
    ),
    responses(
        (status = 200, description = "Student removed", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Student not enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn remove_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((id, profile_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    ClassService::remove_student(&state.db, &caller, id, profile_id).await?;
    Ok(Json(MessageResponse {
        message: "Student removed from the class".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/leave",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Left the class", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Students only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Not enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn leave_class(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let message = ClassService::leave(&state.db, &caller, id).await?;
    Ok(Json(MessageResponse { message }))
}
