//! Spaced repetition: the pure SM-2 scheduler and the transaction that
//! applies it to stored cards.

pub mod engine;
pub mod scheduler;

pub use engine::ReviewEngine;
pub use scheduler::SchedulerError;
