use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::models::Card;
use crate::schema::reviews;

/// An immutable record of one rating applied to a card
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    pub id: i32,
    pub card_id: i32,
    pub rating: i32,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub card_id: i32,
    pub rating: i32,
    pub reviewed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct ReviewResultResponse {
    pub review: Review,
    pub card: Card,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewHistoryResponse {
    pub reviews: Vec<Review>,
}
