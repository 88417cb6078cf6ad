use axum::{Json, extract::State};
use chrono::Utc;

use crate::data::{
    DbPool, with_conn,
    models::{ApiError, StatsResponse},
    repositories::StatsRepository,
};

pub async fn get_stats(State(pool): State<DbPool>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = with_conn(&pool, |conn| {
        StatsRepository::summary(conn, Utc::now()).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(stats))
}
