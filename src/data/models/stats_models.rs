use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub total_entries: i64,
    pub total_cards: i64,
    pub due_today: i64,
    pub reviews_this_week: i64,
}
