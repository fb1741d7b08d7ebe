use crate::modules::join_requests::controller::{
    decide_join_request, list_pending_join_requests, send_join_request,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Mounted under `/api`: paths here are absolute within the API surface
/// because the workflow spans class-scoped and request-scoped routes.
pub fn init_join_requests_router() -> Router<AppState> {
    Router::new()
        .route(
            "/classes/{class_id}/join-requests",
            post(send_join_request).get(list_pending_join_requests),
        )
        .route("/join-requests/{id}/decision", post(decide_join_request))
}
