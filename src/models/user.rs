use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::Deserialize;

use super::FromSqliteRow;
use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    pub username: String,
}

impl CreateUser {
    /// Returns the username to store, rejecting blank input.
    pub fn validate(self) -> Result<String> {
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }
        Ok(self.username)
    }
}
