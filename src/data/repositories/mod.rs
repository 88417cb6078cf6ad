pub mod card;
pub mod entry;
pub mod review;
pub mod stats;

pub use card::CardRepository;
pub use entry::EntryRepository;
pub use review::ReviewRepository;
pub use stats::StatsRepository;
