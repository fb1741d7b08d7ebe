use crate::modules::attendance::controller::{
    list_class_attendance, list_unmarked_dates, mark_attendance, mark_attendance_batch,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Teacher-facing ledger routes, mounted under `/api` and layered with the
/// teacher role gate in the main router.
pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route(
            "/classes/{class_id}/attendance",
            put(mark_attendance).get(list_class_attendance),
        )
        .route(
            "/classes/{class_id}/attendance/batch",
            post(mark_attendance_batch),
        )
        .route(
            "/classes/{class_id}/students/{profile_id}/unmarked-dates",
            get(list_unmarked_dates),
        )
}

/// Student-facing history route, layered with the student role gate.
pub fn init_own_attendance_router() -> Router<AppState> {
    use crate::modules::attendance::controller::list_own_attendance;

    Router::new().route("/attendance/me", get(list_own_attendance))
}
