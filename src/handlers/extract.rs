use axum::extract::FromRequest;

use crate::data::models::ApiError;

/// JSON request body whose rejections render as an [`ApiError`] body
/// instead of axum's plain-text response.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
