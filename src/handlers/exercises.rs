use axum::{extract::State, Json};
use serde::Serialize;

use crate::dates::{format_date, today};
use crate::error::{AppError, Result};
use crate::extract::{JsonOrForm, ValidPath, ValidQuery};
use crate::models::{CreateExercise, Exercise, LogQuery, User};
use crate::repositories::{ExerciseRepository, UserRepository};

#[derive(Clone)]
pub struct ExercisesState {
    pub user_repo: UserRepository,
    pub exercise_repo: ExerciseRepository,
}

/// `id` is the owning user's id, not the exercise's.
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: format_date(exercise.date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    pub id: String,
    pub log: Vec<LogEntry>,
}

async fn find_user(repo: &UserRepository, id: &str) -> Result<User> {
    repo.find_by_id(id).await?.ok_or_else(|| {
        tracing::debug!(user_id = %id, "User not found");
        AppError::UserNotFound
    })
}

pub async fn create(
    State(state): State<ExercisesState>,
    ValidPath(user_id): ValidPath<String>,
    JsonOrForm(form): JsonOrForm<CreateExercise>,
) -> Result<Json<ExerciseResponse>> {
    let new_exercise = form.validate()?;
    let user = find_user(&state.user_repo, &user_id).await?;

    let exercise = state
        .exercise_repo
        .create(
            &user.id,
            &new_exercise.description,
            new_exercise.duration,
            new_exercise.date.unwrap_or_else(today),
        )
        .await?;
    tracing::info!(
        user_id = %user.id,
        exercise_id = %exercise.id,
        "Logged exercise on {}",
        exercise.date
    );

    Ok(Json(ExerciseResponse {
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_date(exercise.date),
        id: user.id,
    }))
}

pub async fn logs(
    State(state): State<ExercisesState>,
    ValidPath(user_id): ValidPath<String>,
    ValidQuery(query): ValidQuery<LogQuery>,
) -> Result<Json<LogResponse>> {
    let filter = query.validate()?;
    let user = find_user(&state.user_repo, &user_id).await?;

    let log: Vec<LogEntry> = state
        .exercise_repo
        .find_by_user(&user.id, filter)
        .await?
        .into_iter()
        .map(LogEntry::from)
        .collect();

    Ok(Json(LogResponse {
        username: user.username,
        count: log.len(),
        id: user.id,
        log,
    }))
}
