use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;
use diesel::sqlite::Sqlite;

use crate::data::models::{
    ApiError, Card, CardRecord, CardType, CreateCardRequest, CreatedCards, NewCard,
};
use crate::data::repositories::EntryRepository;
use crate::features::srs::scheduler::{DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL_DAYS};
use crate::schema::{card_tags, cards};
use crate::utils::{Page, normalize_tags};

pub struct CardRepository;

impl CardRepository {
    /// Creates a card with fresh scheduling state, due immediately.
    ///
    /// A reversible card gets a mirrored twin (front and back swapped) in
    /// the same transaction.
    pub fn create(
        conn: &mut SqliteConnection,
        request: &CreateCardRequest,
        now: DateTime<Utc>,
    ) -> Result<CreatedCards, ApiError> {
        let card_type: CardType = request.card_type.parse().map_err(ApiError::Validation)?;
        if request.front.is_empty() {
            return Err(ApiError::Validation("front is required".into()));
        }
        let back = request.back.as_deref().filter(|back| !back.is_empty());
        if card_type.requires_back() && back.is_none() {
            return Err(ApiError::Validation(format!(
                "back is required for {card_type} cards"
            )));
        }
        let tags = normalize_tags(&request.tags);

        conn.transaction(|conn| {
            if let Some(entry_id) = request.entry_id {
                if !EntryRepository::exists(conn, entry_id)? {
                    return Err(ApiError::EntryNotFound(entry_id));
                }
            }

            let card = Self::insert(conn, card_type, &request.front, back, request.entry_id, &tags, now)?;
            let reverse_card = match (card_type, back) {
                (CardType::Reversible, Some(back)) => Some(Self::insert(
                    conn,
                    card_type,
                    back,
                    Some(&request.front),
                    request.entry_id,
                    &tags,
                    now,
                )?),
                _ => None,
            };

            log::info!(
                "Card {} created ({}){}",
                card.record.id,
                card_type,
                reverse_card
                    .as_ref()
                    .map(|c| format!(" with reverse card {}", c.record.id))
                    .unwrap_or_default()
            );
            Ok(CreatedCards { card, reverse_card })
        })
    }

    fn insert(
        conn: &mut SqliteConnection,
        card_type: CardType,
        front: &str,
        back: Option<&str>,
        entry_id: Option<i32>,
        tags: &[String],
        now: DateTime<Utc>,
    ) -> QueryResult<Card> {
        let record = diesel::insert_into(cards::table)
            .values(&NewCard {
                card_type,
                front,
                back,
                entry_id,
                ease_factor: DEFAULT_EASE_FACTOR,
                interval_days: DEFAULT_INTERVAL_DAYS,
                due_at: now,
                created_at: now,
            })
            .returning(CardRecord::as_returning())
            .get_result(conn)?;

        if !tags.is_empty() {
            let rows: Vec<_> = tags
                .iter()
                .map(|tag| (card_tags::card_id.eq(record.id), card_tags::tag.eq(tag)))
                .collect();
            diesel::insert_into(card_tags::table).values(&rows).execute(conn)?;
        }

        Ok(Card {
            record,
            tags: tags.to_vec(),
        })
    }

    pub fn get(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Card>> {
        let record = cards::table
            .find(id)
            .select(CardRecord::as_select())
            .first(conn)
            .optional()?;

        match record {
            Some(record) => Self::with_tags(conn, record).map(Some),
            None => Ok(None),
        }
    }

    pub fn exists(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        select(exists(cards::table.find(id))).get_result(conn)
    }

    /// Newest first, optionally restricted to one card type. A card must
    /// carry every tag in `tags` to match.
    pub fn list(
        conn: &mut SqliteConnection,
        tags: &[String],
        card_type: Option<CardType>,
        page: Page,
    ) -> QueryResult<(Vec<Card>, i64)> {
        let tags = normalize_tags(tags);

        let total = Self::filtered(&tags, card_type)
            .count()
            .get_result::<i64>(conn)?;
        let records = Self::filtered(&tags, card_type)
            .order((cards::created_at.desc(), cards::id.desc()))
            .limit(page.limit)
            .offset(page.offset)
            .select(CardRecord::as_select())
            .load(conn)?;

        Ok((Self::attach_tags(conn, records)?, total))
    }

    /// Cards with `due_at <= now`, most overdue first, and how many are due in total.
    pub fn due(
        conn: &mut SqliteConnection,
        now: DateTime<Utc>,
        limit: i64,
    ) -> QueryResult<(Vec<Card>, i64)> {
        let total = cards::table
            .filter(cards::due_at.le(now))
            .count()
            .get_result::<i64>(conn)?;
        let records = cards::table
            .filter(cards::due_at.le(now))
            .order((cards::due_at.asc(), cards::id.asc()))
            .limit(limit)
            .select(CardRecord::as_select())
            .load(conn)?;

        Ok((Self::attach_tags(conn, records)?, total))
    }

    /// Deletes the card; its tags and reviews go with it.
    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        let deleted = diesel::delete(cards::table.find(id)).execute(conn)?;
        if deleted > 0 {
            log::info!("Card {} deleted", id);
        }
        Ok(deleted > 0)
    }

    pub fn with_tags(conn: &mut SqliteConnection, record: CardRecord) -> QueryResult<Card> {
        let tags = card_tags::table
            .filter(card_tags::card_id.eq(record.id))
            .order(card_tags::tag)
            .select(card_tags::tag)
            .load(conn)?;
        Ok(Card { record, tags })
    }

    fn filtered<'a>(
        tags: &'a [String],
        card_type: Option<CardType>,
    ) -> cards::BoxedQuery<'a, Sqlite> {
        let mut query = cards::table.into_boxed();
        if let Some(card_type) = card_type {
            query = query.filter(cards::card_type.eq(card_type));
        }
        for tag in tags {
            query = query.filter(
                cards::id.eq_any(
                    card_tags::table
                        .filter(card_tags::tag.eq(tag))
                        .select(card_tags::card_id),
                ),
            );
        }
        query
    }

    fn attach_tags(conn: &mut SqliteConnection, records: Vec<CardRecord>) -> QueryResult<Vec<Card>> {
        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let rows: Vec<(i32, String)> = card_tags::table
            .filter(card_tags::card_id.eq_any(ids))
            .order((card_tags::card_id, card_tags::tag))
            .select((card_tags::card_id, card_tags::tag))
            .load(conn)?;

        let mut by_card: HashMap<i32, Vec<String>> = HashMap::new();
        for (card_id, tag) in rows {
            by_card.entry(card_id).or_default().push(tag);
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let tags = by_card.remove(&record.id).unwrap_or_default();
                Card { record, tags }
            })
            .collect())
    }
}
