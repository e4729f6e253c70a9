#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use exercise_tracker::db::{create_memory_pool, DbPool};
use exercise_tracker::handlers::{exercises, health, users};
use exercise_tracker::migrations::run_migrations_for_tests;
use exercise_tracker::models::{Exercise, User};
use exercise_tracker::repositories::{ExerciseRepository, UserRepository};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());

    let health_state = health::HealthState { pool };
    let users_state = users::UsersState {
        user_repo: user_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        user_repo,
        exercise_repo,
    };

    exercise_tracker::routes::create_router(
        health_state,
        users_state,
        exercises_state,
        concat!(env!("CARGO_MANIFEST_DIR"), "/public"),
    )
}

pub async fn create_test_user(pool: &DbPool, username: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo.create(username).await.unwrap()
}

pub async fn create_test_exercise(
    pool: &DbPool,
    user_id: &str,
    description: &str,
    duration: i64,
    date: &str,
) -> Exercise {
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    exercise_repo
        .create(user_id, description, duration, date)
        .await
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Sends `request` and returns the status with the body parsed as JSON.
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).expect("response body is not JSON");
    (status, json)
}
