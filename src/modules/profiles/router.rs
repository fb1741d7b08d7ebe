use crate::modules::profiles::controller::{
    get_own_profile, get_profile_detail, get_profile_summary, update_own_profile,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_own_profile).put(update_own_profile))
        .route("/{id}", get(get_profile_detail))
        .route("/{id}/summary", get(get_profile_summary))
}
