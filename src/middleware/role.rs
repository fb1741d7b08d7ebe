//! Role-gate middleware.
//!
//! Routes that are uniform in role requirements get a `route_layer` here;
//! everything finer (class ownership, roster membership) is checked in the
//! services against the caller's stored profile.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::profiles::model::Role;
use crate::state::AppState;
use rollcall_core::errors::AppError;

pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<Role>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::permission_denied(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles,
            auth_user.role()
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Layer for teacher-only route groups.
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![Role::Teacher]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Layer for student-only route groups.
pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![Role::Student]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
