use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{exercises, health, pages, users};

/// Builds the application router. Paths that match no route are served from
/// `public_dir`.
pub fn create_router(
    health_state: health::HealthState,
    users_state: users::UsersState,
    exercises_state: exercises::ExercisesState,
    public_dir: impl AsRef<Path>,
) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/health", get(health::health_check))
        .with_state(health_state)
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .with_state(users_state)
        // Exercises
        .route("/api/users/{id}/exercises", post(exercises::create))
        .route("/api/users/{id}/logs", get(exercises::logs))
        .with_state(exercises_state)
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
