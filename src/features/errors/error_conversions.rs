use axum::extract::rejection::JsonRejection;
use validator::ValidationErrors;

use crate::data::models::{ApiError, ReviewError};
use crate::features::srs::SchedulerError;

impl From<SchedulerError> for ReviewError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::InvalidRating(rating) => ReviewError::InvalidRating(rating),
            SchedulerError::IntervalOverflow(days) => ReviewError::IntervalOverflow(days),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::InvalidRating(rating) => ApiError::InvalidRating(rating),
            ReviewError::CardNotFound(card_id) => ApiError::CardNotFound(card_id),
            ReviewError::IntervalOverflow(days) => ApiError::IntervalOverflow(days),
            ReviewError::DatabaseError(e) => ApiError::DatabaseError(e),
        }
    }
}

impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        ReviewError::from(err).into()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        // Report the first field message, e.g. "Content is required"
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| err.to_string());
        ApiError::Validation(message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
