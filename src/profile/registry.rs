use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CheckInError, Result};
use crate::intervention::InterventionKind;

/// Personality style chosen once during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Archetype {
    #[default]
    Warrior,
    Sage,
    Lover,
    Seeker,
}

impl Archetype {
    /// Declaration order doubles as the quiz tie-break order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Warrior,
        Archetype::Sage,
        Archetype::Lover,
        Archetype::Seeker,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Warrior => "Warrior",
            Archetype::Sage => "Sage",
            Archetype::Lover => "Lover",
            Archetype::Seeker => "Seeker",
        }
    }

    pub fn profile(&self) -> &'static ArchetypeProfile {
        profile_of(*self)
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Archetype {
    type Err = CheckInError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Archetype::ALL
            .iter()
            .copied()
            .find(|a| a.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CheckInError::UnknownArchetype(s.to_string()))
    }
}

/// Internal Family Systems part labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    InnerCritic,
    Rebel,
    WoundedChild,
    Pleaser,
    Analyzer,
    Controller,
    Explorer,
    Protector,
}

impl Part {
    /// The universe of parts in picker order.
    pub const ALL: [Part; 8] = [
        Part::InnerCritic,
        Part::Rebel,
        Part::WoundedChild,
        Part::Pleaser,
        Part::Analyzer,
        Part::Controller,
        Part::Explorer,
        Part::Protector,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Part::InnerCritic => "Inner Critic",
            Part::Rebel => "Rebel",
            Part::WoundedChild => "Wounded Child",
            Part::Pleaser => "Pleaser",
            Part::Analyzer => "Analyzer",
            Part::Controller => "Controller",
            Part::Explorer => "Explorer",
            Part::Protector => "Protector",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug)]
pub struct ArchetypeProfile {
    pub archetype: Archetype,
    pub title: &'static str,
    pub tagline: &'static str,
    /// Parts this archetype tends to meet first.
    pub part_sequence: &'static [Part],
    /// Archetype tier of the intervention ranking, most preferred first.
    pub intervention_preferences: &'static [InterventionKind],
}

use InterventionKind::{GratitudeRitual, LovedOneLetter, PhysiologicReset, WildernessJournal};

static PROFILES: [ArchetypeProfile; 4] = [
    ArchetypeProfile {
        archetype: Archetype::Warrior,
        title: "The Warrior",
        tagline: "Courage and determination. You meet challenges head-on.",
        part_sequence: &[Part::Protector, Part::Controller, Part::Rebel],
        intervention_preferences: &[PhysiologicReset, WildernessJournal, GratitudeRitual, LovedOneLetter],
    },
    ArchetypeProfile {
        archetype: Archetype::Sage,
        title: "The Sage",
        tagline: "Wisdom and understanding. You step back and see clearly.",
        part_sequence: &[Part::Analyzer, Part::InnerCritic, Part::Controller],
        intervention_preferences: &[WildernessJournal, GratitudeRitual, PhysiologicReset, LovedOneLetter],
    },
    ArchetypeProfile {
        archetype: Archetype::Lover,
        title: "The Lover",
        tagline: "Compassion and connection. You heal through relationship.",
        part_sequence: &[Part::Pleaser, Part::WoundedChild, Part::Protector],
        intervention_preferences: &[LovedOneLetter, GratitudeRitual, WildernessJournal, PhysiologicReset],
    },
    ArchetypeProfile {
        archetype: Archetype::Seeker,
        title: "The Seeker",
        tagline: "Curiosity and adaptability. You grow by exploring.",
        part_sequence: &[Part::Explorer, Part::Rebel, Part::WoundedChild],
        intervention_preferences: &[WildernessJournal, PhysiologicReset, GratitudeRitual, LovedOneLetter],
    },
];

pub fn profile_of(archetype: Archetype) -> &'static ArchetypeProfile {
    match archetype {
        Archetype::Warrior => &PROFILES[0],
        Archetype::Sage => &PROFILES[1],
        Archetype::Lover => &PROFILES[2],
        Archetype::Seeker => &PROFILES[3],
    }
}

/// Concatenates `priority` with the rest of `universe`, keeping the first
/// occurrence of each item.
pub fn merge_priority<T: Copy + PartialEq>(priority: &[T], universe: &[T]) -> Vec<T> {
    let mut ordered: Vec<T> = Vec::with_capacity(universe.len());
    for item in priority.iter().chain(universe.iter()) {
        if !ordered.contains(item) {
            ordered.push(*item);
        }
    }
    ordered
}

/// Parts in the order the check-in should offer them for `archetype`.
pub fn part_ordering(archetype: Archetype) -> Vec<Part> {
    merge_priority(profile_of(archetype).part_sequence, &Part::ALL)
}
