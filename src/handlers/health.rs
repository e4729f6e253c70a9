use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::db::DbPool;
use crate::version::GIT_VERSION;

#[derive(Clone)]
pub struct HealthState {
    pub pool: DbPool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: CheckStatus,
    database: CheckStatus,
    git_version: &'static str,
}

/// Reports the build version and whether the store answers a trivial query.
/// Responds 503 when it does not.
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let pool = state.pool;
    let database = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let conn = pool.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    })
    .await;

    let database = match database {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!("Health check failed: {:#}", e);
            CheckStatus::Error
        }
        Err(e) => {
            tracing::warn!("Health check task failed: {}", e);
            CheckStatus::Error
        }
    };

    let code = match database {
        CheckStatus::Ok => StatusCode::OK,
        CheckStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthResponse {
            status: database,
            database,
            git_version: GIT_VERSION,
        }),
    )
}
