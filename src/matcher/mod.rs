// Duplicate detection: external refs first, then fuzzy names within a neighborhood
pub mod duplicates;
pub mod similarity;

pub use duplicates::{DEFAULT_SIMILARITY_THRESHOLD, DuplicateCheck, DuplicateMatcher};
pub use similarity::{comparison_key, similarity};
