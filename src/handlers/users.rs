use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::extract::JsonOrForm;
use crate::models::{CreateUser, User};
use crate::repositories::UserRepository;

#[derive(Clone)]
pub struct UsersState {
    pub user_repo: UserRepository,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub id: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            id: user.id,
        }
    }
}

pub async fn create(
    State(state): State<UsersState>,
    JsonOrForm(form): JsonOrForm<CreateUser>,
) -> Result<Json<UserResponse>> {
    let username = form.validate()?;

    let user = state.user_repo.create(&username).await?;
    tracing::info!(user_id = %user.id, "Created user {}", user.username);

    Ok(Json(user.into()))
}

pub async fn list(State(state): State<UsersState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.user_repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
