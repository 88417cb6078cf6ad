pub mod pagination;
pub mod tags;

pub use pagination::{ListParams, Page};
pub use tags::normalize_tags;
