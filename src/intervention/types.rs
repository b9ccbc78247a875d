use serde::{Deserialize, Serialize};
use std::fmt;

/// Coping practice categories. Declaration order is registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterventionKind {
    LovedOneLetter,
    WildernessJournal,
    GratitudeRitual,
    /// Breathing and tapping resets (sigh, alternate nostril, EFT).
    PhysiologicReset,
}

impl InterventionKind {
    pub const ALL: [InterventionKind; 4] = [
        InterventionKind::LovedOneLetter,
        InterventionKind::WildernessJournal,
        InterventionKind::GratitudeRitual,
        InterventionKind::PhysiologicReset,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            InterventionKind::LovedOneLetter => "a letter to a loved one",
            InterventionKind::WildernessJournal => "a wilderness journal entry",
            InterventionKind::GratitudeRitual => "a gratitude ritual",
            InterventionKind::PhysiologicReset => "a physiologic reset",
        }
    }

    /// Whether the caller should route to a timed reset rather than a
    /// writing prompt.
    pub fn is_timed_reset(&self) -> bool {
        matches!(self, InterventionKind::PhysiologicReset)
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.title())
    }
}

/// A ranked recommendation. Produced fresh per check-in, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionSuggestion {
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub priority: f64,
    pub reason: String,
}
