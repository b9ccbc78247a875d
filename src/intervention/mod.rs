pub mod types;
pub mod catalog;
pub mod library;

pub use types::*;
pub use catalog::{suggest, suggest_labels};
pub use library::{for_archetype, practice_for, Intervention};
