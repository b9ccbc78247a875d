pub mod error;
pub mod config;
pub mod mood;
pub mod profile;
pub mod onboarding;
pub mod intervention;
pub mod checkin;
pub mod reset;
pub mod services;

// Re-export the entry points most callers need
pub use checkin::{CheckInManager, CheckInSnapshot, FileStore, KeyValueStore, LocalDay, MemoryStore};
pub use config::CheckInConfig;
pub use error::{CheckInError, StoreError};
pub use intervention::{suggest, InterventionKind, InterventionSuggestion};
pub use mood::{quadrant_of, Emotion, Intensity, MoodLogEntry, Quadrant};
pub use profile::{part_ordering, Archetype, Part};
