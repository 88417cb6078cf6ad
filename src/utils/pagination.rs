use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const DEFAULT_DUE_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query string shared by the list endpoints. `tags` may repeat.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub tags: Vec<String>,
    pub card_type: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Clamps `limit` to `1..=MAX_LIMIT` and `offset` to non-negative values.
    pub fn new(limit: Option<i64>, offset: Option<i64>, default_limit: i64) -> Self {
        Self {
            limit: limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
