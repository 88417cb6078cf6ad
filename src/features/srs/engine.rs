use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::data::models::{CardRecord, NewReview, Review, ReviewError};
use crate::features::srs::scheduler::{self, Rating};
use crate::schema::{cards, reviews};

/// Result of a committed review
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub card: CardRecord,
    pub review: Review,
    pub message: String,
}

/// Applies ratings to cards.
///
/// Each review reads the card, schedules it, updates it and appends a
/// review row inside one `BEGIN IMMEDIATE` transaction. Holding the write
/// lock from the read onwards means two reviews of the same card are
/// applied one after the other, never both from the same prior state.
pub struct ReviewEngine<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ReviewEngine<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        ReviewEngine { conn }
    }

    /// Records a review stamped with the current time.
    pub fn record_review(&mut self, card_id: i32, rating: i64) -> Result<ReviewOutcome, ReviewError> {
        self.record_review_with(card_id, rating, Utc::now)
    }

    /// Records a review stamped by `clock`.
    ///
    /// The clock is read once, after the write lock is held, and that
    /// instant is used both for scheduling and as `reviewed_at`, so review
    /// timestamps follow commit order.
    pub fn record_review_with<C>(
        &mut self,
        card_id: i32,
        rating: i64,
        clock: C,
    ) -> Result<ReviewOutcome, ReviewError>
    where
        C: FnOnce() -> DateTime<Utc>,
    {
        let rating = Rating::try_from(rating)?;

        self.conn.immediate_transaction(|conn| {
            let card = cards::table
                .find(card_id)
                .select(CardRecord::as_select())
                .first(conn)
                .optional()?
                .ok_or(ReviewError::CardNotFound(card_id))?;

            let now = clock();
            let next =
                scheduler::schedule(rating.value().into(), card.ease_factor, card.interval_days, now)?;

            let card = diesel::update(cards::table.find(card_id))
                .set((
                    cards::ease_factor.eq(next.ease_factor),
                    cards::interval_days.eq(next.interval_days),
                    cards::due_at.eq(next.due_at),
                ))
                .returning(CardRecord::as_returning())
                .get_result(conn)?;

            let review = diesel::insert_into(reviews::table)
                .values(&NewReview {
                    card_id,
                    rating: rating.value(),
                    reviewed_at: now,
                })
                .returning(Review::as_returning())
                .get_result(conn)?;

            log::info!(
                "Card {} reviewed as {}: interval {} day(s), ease {:.2}",
                card_id,
                rating.name(),
                card.interval_days,
                card.ease_factor
            );

            Ok(ReviewOutcome {
                message: format!(
                    "Recorded {} ({}). Next review in {} day(s).",
                    rating.name(),
                    rating.value(),
                    card.interval_days
                ),
                card,
                review,
            })
        })
    }
}
