use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schema::cards;

/// Kind of flashcard. Fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// Question on the front, answer on the back
    Basic,
    /// Reviewed in both directions; created together with a mirrored twin
    Reversible,
    /// Fill-in-the-blank text on the front, back optional
    Cloze,
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Basic => "basic",
            CardType::Reversible => "reversible",
            CardType::Cloze => "cloze",
        }
    }

    pub fn requires_back(self) -> bool {
        !matches!(self, CardType::Cloze)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(CardType::Basic),
            "reversible" => Ok(CardType::Reversible),
            "cloze" => Ok(CardType::Cloze),
            _ => Err("card_type must be 'basic', 'reversible', or 'cloze'".to_string()),
        }
    }
}

impl ToSql<Text, Sqlite> for CardType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for CardType {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(Into::into)
    }
}

/// A row of the `cards` table, without its tags.
///
/// `ease_factor`, `interval_days` and `due_at` are written only by
/// [`ReviewEngine`](crate::features::srs::ReviewEngine).
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CardRecord {
    pub id: i32,
    pub card_type: CardType,
    pub front: String,
    pub back: Option<String>,
    pub entry_id: Option<i32>,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub due_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = cards)]
pub struct NewCard<'a> {
    pub card_type: CardType,
    pub front: &'a str,
    pub back: Option<&'a str>,
    pub entry_id: Option<i32>,
    pub ease_factor: f64,
    pub interval_days: i32,
    pub due_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A card as returned to callers, with its tags attached
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    #[serde(flatten)]
    pub record: CardRecord,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    pub card_type: String,
    #[validate(length(min = 1, message = "front is required"))]
    pub front: String,
    pub back: Option<String>,
    pub entry_id: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedCards {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_card: Option<Card>,
}

#[derive(Debug, Serialize)]
pub struct CardListResponse {
    pub cards: Vec<Card>,
    pub total: i64,
}
