use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    data::{DbPool, with_conn, models::ApiError},
    features::tools::{self, ToolDefinition},
};

pub async fn list_tools() -> Json<Vec<ToolDefinition>> {
    Json(tools::definitions())
}

/// The request body is the tool's argument object; an empty body means no arguments.
pub async fn call_tool(
    State(pool): State<DbPool>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let arguments = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(arguments) => arguments,
            Err(e) => return Ok(Json(json!({ "error": format!("Invalid arguments: {e}") }))),
        }
    };

    let result = with_conn(&pool, move |conn| {
        Ok::<_, ApiError>(tools::call_tool(conn, &name, arguments))
    })
    .await?;

    Ok(Json(result))
}
