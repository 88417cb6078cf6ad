//! Named tools with JSON arguments for tool-calling clients.
//!
//! Each tool marshals its arguments onto the same repositories and review
//! engine the HTTP API uses. Failures come back as `{"error": "..."}`
//! rather than as transport errors, so the client can show them.

mod definitions;

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::data::models::{ApiError, CardType, CreateCardRequest, ReviewResultResponse};
use crate::data::repositories::{CardRepository, EntryRepository, StatsRepository};
use crate::features::srs::ReviewEngine;
use crate::utils::Page;
use crate::utils::pagination::{DEFAULT_DUE_LIMIT, DEFAULT_LIMIT, MAX_LIMIT};

pub use definitions::{ToolDefinition, definitions};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<diesel::result::Error> for ToolError {
    fn from(err: diesel::result::Error) -> Self {
        ToolError::Api(ApiError::DatabaseError(err))
    }
}

#[derive(Debug, Deserialize)]
struct LogEntryArgs {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEntriesArgs {
    #[serde(default)]
    query: String,
    #[serde(default)]
    tags: Vec<String>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreateCardArgs {
    #[serde(default)]
    card_type: String,
    #[serde(default)]
    front: String,
    back: Option<String>,
    entry_id: Option<i32>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DueCardsArgs {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RecordReviewArgs {
    card_id: Option<i32>,
    rating: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct BrowseCardsArgs {
    #[serde(default)]
    tags: Vec<String>,
    card_type: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Runs a tool and returns its JSON result, or `{"error": ...}`.
pub fn call_tool(conn: &mut SqliteConnection, name: &str, arguments: Value) -> Value {
    match dispatch(conn, name, arguments, Utc::now()) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Tool {} failed: {}", name, e);
            json!({ "error": e.to_string() })
        }
    }
}

fn dispatch(
    conn: &mut SqliteConnection,
    name: &str,
    arguments: Value,
    now: DateTime<Utc>,
) -> Result<Value, ToolError> {
    log::debug!("Calling tool {}", name);
    match name {
        "log_entry" => log_entry(conn, parse(arguments)?, now),
        "search_entries" => search_entries(conn, parse(arguments)?),
        "create_card" => create_card(conn, parse(arguments)?, now),
        "get_due_cards" => get_due_cards(conn, parse(arguments)?, now),
        "record_review" => record_review(conn, parse(arguments)?),
        "browse_cards" => browse_cards(conn, parse(arguments)?),
        "get_stats" => Ok(json!(StatsRepository::summary(conn, now)?)),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };
    Ok(serde_json::from_value(arguments)?)
}

fn log_entry(
    conn: &mut SqliteConnection,
    args: LogEntryArgs,
    now: DateTime<Utc>,
) -> Result<Value, ToolError> {
    let entry = EntryRepository::create(conn, &args.content, &args.tags, now)?;
    Ok(json!({ "entry": entry }))
}

fn search_entries(conn: &mut SqliteConnection, args: SearchEntriesArgs) -> Result<Value, ToolError> {
    let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let entries = EntryRepository::search(conn, &args.query, &args.tags, limit)?;
    Ok(json!({ "entries": entries }))
}

fn create_card(
    conn: &mut SqliteConnection,
    args: CreateCardArgs,
    now: DateTime<Utc>,
) -> Result<Value, ToolError> {
    let request = CreateCardRequest {
        card_type: args.card_type,
        front: args.front,
        back: args.back,
        entry_id: args.entry_id,
        tags: args.tags,
    };
    let created = CardRepository::create(conn, &request, now)?;
    Ok(json!(created))
}

fn get_due_cards(
    conn: &mut SqliteConnection,
    args: DueCardsArgs,
    now: DateTime<Utc>,
) -> Result<Value, ToolError> {
    let limit = args.limit.unwrap_or(DEFAULT_DUE_LIMIT).clamp(1, MAX_LIMIT);
    let (cards, _) = CardRepository::due(conn, now, limit)?;
    Ok(json!({
        "due_count": cards.len(),
        "cards": cards,
    }))
}

fn record_review(conn: &mut SqliteConnection, args: RecordReviewArgs) -> Result<Value, ToolError> {
    let card_id = args
        .card_id
        .ok_or_else(|| ApiError::Validation("card_id is required".into()))?;
    let rating = args.rating.ok_or_else(|| {
        ApiError::Validation("rating must be 0 (again), 1 (hard), 2 (good), or 3 (easy)".into())
    })?;

    let outcome = ReviewEngine::new(conn)
        .record_review(card_id, rating)
        .map_err(ApiError::from)?;
    let card = CardRepository::with_tags(conn, outcome.card)?;

    Ok(json!(ReviewResultResponse {
        review: outcome.review,
        card,
        message: outcome.message,
    }))
}

fn browse_cards(conn: &mut SqliteConnection, args: BrowseCardsArgs) -> Result<Value, ToolError> {
    let card_type = args
        .card_type
        .as_deref()
        .map(str::parse::<CardType>)
        .transpose()
        .map_err(ApiError::Validation)?;
    let page = Page::new(args.limit, args.offset, DEFAULT_LIMIT);

    let (cards, total) = CardRepository::list(conn, &args.tags, card_type, page)?;
    Ok(json!({
        "cards": cards,
        "total": total,
        "limit": page.limit,
        "offset": page.offset,
    }))
}
