pub mod duplicates;
pub mod import;
pub mod listing;
pub mod place;
pub mod stats;
