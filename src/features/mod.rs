pub mod errors;
pub mod srs;
pub mod tools;
