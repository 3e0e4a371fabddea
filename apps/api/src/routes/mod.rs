pub mod credential;
pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::export::handlers as export_handlers;
use crate::generation::handlers as generation_handlers;
use crate::profiles::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profiles",
            get(profile_handlers::handle_list_profiles).post(profile_handlers::handle_save_profile),
        )
        .route(
            "/api/v1/profiles/:name",
            get(profile_handlers::handle_get_profile).delete(profile_handlers::handle_delete_profile),
        )
        // Generation API
        .route(
            "/api/v1/resumes/generate",
            post(generation_handlers::handle_generate),
        )
        .route(
            "/api/v1/resumes/story",
            post(generation_handlers::handle_generate_story),
        )
        .route(
            "/api/v1/history/:profile_name",
            get(generation_handlers::handle_get_history),
        )
        .route(
            "/api/v1/history/:profile_name/:id",
            delete(generation_handlers::handle_delete_history_entry),
        )
        // Export API
        .route("/api/v1/export/:format", post(export_handlers::handle_export))
        // Credential API
        .route(
            "/api/v1/credential",
            get(credential::handle_get_credential).put(credential::handle_set_credential),
        )
        .with_state(state)
}
