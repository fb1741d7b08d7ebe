use crate::modules::classes::controller::{
    add_student, create_class, delete_class, get_class_detail, leave_class, list_enrolled_classes,
    list_taught_classes, remove_student, search_classes, update_class,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn init_classes_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_class))
        .route("/search", get(search_classes))
        .route("/taught", get(list_taught_classes))
        .route("/enrolled", get(list_enrolled_classes))
        .route(
            "/{class_id}",
            get(get_class_detail).put(update_class).delete(delete_class),
        )
        .route("/{class_id}/students", post(add_student))
        .route("/{class_id}/students/{profile_id}", delete(remove_student))
        .route("/{class_id}/leave", post(leave_class))
}
