use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;

use crate::data::models::StatsResponse;
use crate::schema::{cards, entries, reviews};

pub struct StatsRepository;

impl StatsRepository {
    pub fn summary(conn: &mut SqliteConnection, now: DateTime<Utc>) -> QueryResult<StatsResponse> {
        let week_ago = now - Duration::days(7);

        Ok(StatsResponse {
            total_entries: entries::table.count().get_result(conn)?,
            total_cards: cards::table.count().get_result(conn)?,
            due_today: cards::table
                .filter(cards::due_at.le(now))
                .count()
                .get_result(conn)?,
            reviews_this_week: reviews::table
                .filter(reviews::reviewed_at.ge(week_ago))
                .count()
                .get_result(conn)?,
        })
    }
}
