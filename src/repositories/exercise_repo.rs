use chrono::{NaiveDate, Utc};
use rusqlite::types::ToSql;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Exercise, FromSqliteRow, LogFilter};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        description: &str,
        duration: i64,
        date: NaiveDate,
    ) -> Result<Exercise> {
        let exercise = Exercise {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            description: description.to_string(),
            duration,
            date,
            created_at: Utc::now(),
        };
        let exercise_clone = exercise.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (id, user_id, description, duration, date, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    exercise_clone.id,
                    exercise_clone.user_id,
                    exercise_clone.description,
                    exercise_clone.duration,
                    exercise_clone.date,
                    exercise_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(exercise)
    }

    /// Exercises of one user matching `filter`, oldest date first and in
    /// insertion order within a day.
    pub async fn find_by_user(&self, user_id: &str, filter: LogFilter) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut query = String::from("SELECT * FROM exercises WHERE user_id = ?");
            let mut params: Vec<&dyn ToSql> = vec![&user_id];

            if let Some(from) = filter.from.as_ref() {
                query.push_str(" AND date >= ?");
                params.push(from);
            }
            if let Some(to) = filter.to.as_ref() {
                query.push_str(" AND date <= ?");
                params.push(to);
            }

            query.push_str(" ORDER BY date, created_at, rowid");

            if let Some(limit) = filter.limit.as_ref() {
                query.push_str(" LIMIT ?");
                params.push(limit);
            }

            let conn = pool.get()?;
            let mut stmt = conn.prepare(&query)?;
            let exercises = stmt
                .query_map(params.as_slice(), Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
