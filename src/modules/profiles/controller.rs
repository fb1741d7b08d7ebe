use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::profiles::model::{
    ProfileDetailResponse, ProfileInfo, ProfileSummaryResponse, UpdateProfileDto,
};
use crate::modules::profiles::service::ProfileService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use rollcall_core::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/profiles/me",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileInfo),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state))]
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ProfileInfo>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let info = ProfileService::get_info(&state.db, caller.id).await?;
    Ok(Json(info))
}

#[utoipa::path(
    put,
    path = "/api/profiles/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ProfileInfo),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state, dto))]
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ProfileInfo>, AppError> {
    let caller = ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let info = ProfileService::update_own(&state.db, &caller, dto).await?;
    Ok(Json(info))
}

#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile detail with attendance history", body = ProfileDetailResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state))]
pub async fn get_profile_detail(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileDetailResponse>, AppError> {
    // Any authenticated caller may view; resolve the caller to reject stale tokens.
    ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let detail = ProfileService::detail(&state.db, id).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    get,
    path = "/api/profiles/{id}/summary",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Per-class presence rates", body = ProfileSummaryResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profiles"
)]
#[instrument(skip(state))]
pub async fn get_profile_summary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileSummaryResponse>, AppError> {
    ProfileService::get_by_user_id(&state.db, auth_user.user_id()?).await?;
    let summary = ProfileService::summary(&state.db, id).await?;
    Ok(Json(summary))
}
