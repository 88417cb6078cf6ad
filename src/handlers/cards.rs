use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use chrono::Utc;
use validator::Validate;

use crate::{
    data::{
        DbPool, with_conn,
        models::{
            ApiError, Card, CardListResponse, CardType, CreateCardRequest, CreatedCards,
            ReviewHistoryResponse, ReviewRequest, ReviewResultResponse,
        },
        repositories::{CardRepository, ReviewRepository},
    },
    features::srs::{ReviewEngine, scheduler},
    handlers::extract::JsonBody,
    utils::{
        ListParams, Page,
        pagination::{DEFAULT_DUE_LIMIT, DEFAULT_LIMIT},
    },
};

pub async fn list_cards(
    State(pool): State<DbPool>,
    Query(params): Query<ListParams>,
) -> Result<Json<CardListResponse>, ApiError> {
    let card_type = params
        .card_type
        .as_deref()
        .map(str::parse::<CardType>)
        .transpose()
        .map_err(ApiError::Validation)?;
    let page = Page::new(params.limit, params.offset, DEFAULT_LIMIT);

    let (cards, total) = with_conn(&pool, move |conn| {
        CardRepository::list(conn, &params.tags, card_type, page).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(CardListResponse { cards, total }))
}

pub async fn due_cards(
    State(pool): State<DbPool>,
    Query(params): Query<ListParams>,
) -> Result<Json<CardListResponse>, ApiError> {
    let limit = Page::new(params.limit, None, DEFAULT_DUE_LIMIT).limit;
    let (cards, total) = with_conn(&pool, move |conn| {
        CardRepository::due(conn, Utc::now(), limit).map_err(ApiError::from)
    })
    .await?;

    Ok(Json(CardListResponse { cards, total }))
}

pub async fn get_card(
    State(pool): State<DbPool>,
    Path(card_id): Path<i32>,
) -> Result<Json<Card>, ApiError> {
    let card = with_conn(&pool, move |conn| {
        CardRepository::get(conn, card_id)?.ok_or(ApiError::CardNotFound(card_id))
    })
    .await?;

    Ok(Json(card))
}

pub async fn create_card(
    State(pool): State<DbPool>,
    JsonBody(payload): JsonBody<CreateCardRequest>,
) -> Result<(StatusCode, Json<CreatedCards>), ApiError> {
    payload.validate()?;

    let created = with_conn(&pool, move |conn| {
        CardRepository::create(conn, &payload, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_card(
    State(pool): State<DbPool>,
    Path(card_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    with_conn(&pool, move |conn| {
        if CardRepository::delete(conn, card_id)? {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(ApiError::CardNotFound(card_id))
        }
    })
    .await
}

pub async fn review_card(
    State(pool): State<DbPool>,
    Path(card_id): Path<i32>,
    JsonBody(payload): JsonBody<ReviewRequest>,
) -> Result<Json<ReviewResultResponse>, ApiError> {
    let result = with_conn(&pool, move |conn| {
        let outcome = ReviewEngine::new(conn).record_review(card_id, payload.rating)?;
        let card = CardRepository::with_tags(conn, outcome.card)?;
        Ok::<_, ApiError>(ReviewResultResponse {
            review: outcome.review,
            card,
            message: outcome.message,
        })
    })
    .await?;

    Ok(Json(result))
}

pub async fn card_reviews(
    State(pool): State<DbPool>,
    Path(card_id): Path<i32>,
) -> Result<Json<ReviewHistoryResponse>, ApiError> {
    let reviews = with_conn(&pool, move |conn| {
        if !CardRepository::exists(conn, card_id)? {
            return Err(ApiError::CardNotFound(card_id));
        }
        Ok(ReviewRepository::history(conn, card_id)?)
    })
    .await?;

    Ok(Json(ReviewHistoryResponse { reviews }))
}

pub async fn preview_card(
    State(pool): State<DbPool>,
    Path(card_id): Path<i32>,
) -> Result<Json<scheduler::IntervalPreview>, ApiError> {
    let card = with_conn(&pool, move |conn| {
        CardRepository::get(conn, card_id)?.ok_or(ApiError::CardNotFound(card_id))
    })
    .await?;

    let preview = scheduler::preview(card.record.ease_factor, card.record.interval_days, Utc::now())?;
    Ok(Json(preview))
}
