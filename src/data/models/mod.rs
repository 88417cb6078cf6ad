pub mod card_models;
pub mod entry_models;
pub mod error_models;
pub mod review_models;
pub mod stats_models;

pub use card_models::{Card, CardListResponse, CardRecord, CardType, CreateCardRequest, CreatedCards, NewCard};
pub use entry_models::{CreateEntryRequest, Entry, EntryListResponse, EntryRecord, NewEntry};
pub use error_models::{ApiError, ReviewError};
pub use review_models::{NewReview, Review, ReviewHistoryResponse, ReviewRequest, ReviewResultResponse};
pub use stats_models::StatsResponse;
