use diesel::prelude::*;

use crate::data::models::Review;
use crate::schema::reviews;

pub struct ReviewRepository;

impl ReviewRepository {
    /// Every review of the card in commit order.
    pub fn history(conn: &mut SqliteConnection, card_id: i32) -> QueryResult<Vec<Review>> {
        reviews::table
            .filter(reviews::card_id.eq(card_id))
            .order((reviews::reviewed_at.asc(), reviews::id.asc()))
            .select(Review::as_select())
            .load(conn)
    }
}
