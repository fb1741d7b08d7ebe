use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::join_requests::model::{DecideJoinRequestDto, JoinRequest, JoinRequestInfo};
use crate::modules::join_requests::service::JoinRequestService;
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use rollcall_core::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/join-requests",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Pending request (new or already existing)", body = JoinRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Students only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Join Requests"
)]
#[instrument(skip(state))]
pub async fn send_join_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<JoinRequest>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let request = JoinRequestService::send(&state.db, &caller, class_id).await?;
    Ok(Json(request))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}/join-requests",
    params(("class_id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Pending requests for the class", body = [JoinRequestInfo]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Join Requests"
)]
#[instrument(skip(state))]
pub async fn list_pending_join_requests(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(class_id): Path<Uuid>,
) -> Result<Json<Vec<JoinRequestInfo>>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let requests = JoinRequestService::list_pending(&state.db, &caller, class_id).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    post,
    path = "/api/join-requests/{id}/decision",
    params(("id" = Uuid, Path, description = "Join request ID")),
    request_body = DecideJoinRequestDto,
    responses(
        (status = 200, description = "Request decided", body = JoinRequest),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owner only", body = ErrorResponse),
        (status = 404, description = "Join request not found", body = ErrorResponse),
        (status = 409, description = "Request already decided", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Join Requests"
)]
#[instrument(skip(state, dto))]
pub async fn decide_join_request(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<DecideJoinRequestDto>,
) -> Result<Json<JoinRequest>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let request = JoinRequestService::decide(&state.db, &caller, id, dto.action).await?;
    Ok(Json(request))
}
