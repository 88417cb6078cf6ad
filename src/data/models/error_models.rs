use diesel::result::Error as DieselError;
use thiserror::Error;
use tokio::task::JoinError;

/// Failures of the review transaction. Every variant leaves the card and
/// its review history exactly as they were before the call.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("rating must be 0 (again), 1 (hard), 2 (good), or 3 (easy), got {0}")]
    InvalidRating(i64),
    #[error("Card {0} not found")]
    CardNotFound(i32),
    #[error("next review is too far in the future ({0} days)")]
    IntervalOverflow(i64),
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),
}

// Errors surfaced by the CRUD and tool layers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("rating must be 0 (again), 1 (hard), 2 (good), or 3 (easy), got {0}")]
    InvalidRating(i64),
    #[error("Entry {0} not found")]
    EntryNotFound(i32),
    #[error("Card {0} not found")]
    CardNotFound(i32),
    #[error("next review is too far in the future ({0} days)")]
    IntervalOverflow(i64),
    #[error("Database error: {0}")]
    DatabaseError(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("Background task failed: {0}")]
    TaskError(#[from] JoinError),
}
