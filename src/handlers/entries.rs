use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use chrono::Utc;
use serde_json::{Value, json};
use validator::Validate;

use crate::{
    data::{
        DbPool, with_conn,
        models::{ApiError, CreateEntryRequest, Entry, EntryListResponse},
        repositories::EntryRepository,
    },
    handlers::extract::JsonBody,
    utils::{ListParams, Page, pagination::DEFAULT_LIMIT},
};

pub async fn list_entries(
    State(pool): State<DbPool>,
    Query(params): Query<ListParams>,
) -> Result<Json<EntryListResponse>, ApiError> {
    let page = Page::new(params.limit, params.offset, DEFAULT_LIMIT);
    let (entries, total) = with_conn(&pool, move |conn| {
        EntryRepository::list(conn, &params.tags, page).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(EntryListResponse { entries, total }))
}

pub async fn search_entries(
    State(pool): State<DbPool>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let limit = Page::new(params.limit, None, DEFAULT_LIMIT).limit;
    let query = params.q.unwrap_or_default();
    let entries = with_conn(&pool, move |conn| {
        EntryRepository::search(conn, &query, &params.tags, limit).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(json!({ "entries": entries })))
}

pub async fn get_entry(
    State(pool): State<DbPool>,
    Path(entry_id): Path<i32>,
) -> Result<Json<Entry>, ApiError> {
    let entry = with_conn(&pool, move |conn| {
        EntryRepository::get(conn, entry_id)?.ok_or(ApiError::EntryNotFound(entry_id))
    })
    .await?;

    Ok(Json(entry))
}

pub async fn create_entry(
    State(pool): State<DbPool>,
    JsonBody(payload): JsonBody<CreateEntryRequest>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    payload.validate()?;

    let entry = with_conn(&pool, move |conn| {
        EntryRepository::create(conn, &payload.content, &payload.tags, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_entry(
    State(pool): State<DbPool>,
    Path(entry_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    with_conn(&pool, move |conn| {
        if EntryRepository::delete(conn, entry_id)? {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(ApiError::EntryNotFound(entry_id))
        }
    })
    .await
}
