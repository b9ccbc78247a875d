use chrono::{DateTime, FixedOffset};

use super::types::{InterventionKind, InterventionSuggestion};
use crate::error::Result;
use crate::mood::{Emotion, Intensity, MoodLogEntry, Quadrant};
use crate::profile::{profile_of, Archetype};

use InterventionKind::{GratitudeRitual, LovedOneLetter, PhysiologicReset, WildernessJournal};

/// Linear decay per tier: weight at rank i is `start - step * i`.
#[derive(Debug, Clone, Copy)]
pub struct TierWeight {
    pub start: f64,
    pub step: f64,
}

impl TierWeight {
    pub fn at(&self, rank: usize) -> f64 {
        (self.start - self.step * rank as f64).max(0.0)
    }
}

pub const EMOTION_TIER: TierWeight = TierWeight { start: 10.0, step: 2.0 };
pub const QUADRANT_TIER: TierWeight = TierWeight { start: 6.0, step: 1.5 };
pub const ARCHETYPE_TIER: TierWeight = TierWeight { start: 4.0, step: 1.0 };

pub const HIGH_INTENSITY_THRESHOLD: u8 = 4;
pub const HIGH_INTENSITY_RESET_BONUS: f64 = 3.0;

/// Explicit per-emotion overrides. Emotions not listed have no emotion tier.
pub fn emotion_preferences(emotion: Emotion) -> &'static [InterventionKind] {
    match emotion {
        Emotion::Happy => &[GratitudeRitual],
        Emotion::Calm => &[WildernessJournal],
        Emotion::Anxious => &[PhysiologicReset],
        Emotion::Overwhelmed => &[PhysiologicReset],
        Emotion::Angry => &[PhysiologicReset],
        Emotion::Sad => &[LovedOneLetter, WildernessJournal],
        Emotion::Lonely => &[LovedOneLetter, GratitudeRitual],
        Emotion::Content => &[GratitudeRitual],
        _ => &[],
    }
}

/// Fallback preferences. Total over quadrants.
pub fn quadrant_preferences(quadrant: Quadrant) -> &'static [InterventionKind] {
    match quadrant {
        Quadrant::HighPleasant => &[GratitudeRitual, WildernessJournal, LovedOneLetter],
        Quadrant::HighUnpleasant => &[PhysiologicReset, WildernessJournal, LovedOneLetter],
        Quadrant::LowUnpleasant => &[LovedOneLetter, WildernessJournal, PhysiologicReset],
        Quadrant::LowPleasant => &[WildernessJournal, GratitudeRitual, LovedOneLetter],
    }
}

/// Score map that remembers first-insertion order for tie-breaking.
#[derive(Debug, Default)]
struct ScoreBoard {
    scores: Vec<(InterventionKind, f64)>,
}

impl ScoreBoard {
    fn add(&mut self, kind: InterventionKind, points: f64) {
        match self.scores.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, score)) => *score += points,
            None => self.scores.push((kind, points)),
        }
    }

    fn add_tier(&mut self, preferences: &[InterventionKind], weight: TierWeight) {
        for (rank, kind) in preferences.iter().enumerate() {
            let points = weight.at(rank);
            if points > 0.0 {
                self.add(*kind, points);
            }
        }
    }

    fn ranked(mut self) -> Vec<(InterventionKind, f64)> {
        self.scores.retain(|(_, s)| *s != 0.0);
        // Stable: equal scores keep insertion order.
        self.scores
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        self.scores
    }
}

fn reason_for(kind: InterventionKind, entry: &MoodLogEntry, archetype: Archetype) -> String {
    format!(
        "Feeling {} ({}): {} suits the {} in you",
        entry.emotion.label(),
        entry.intensity.band().label(),
        kind.title(),
        archetype.label()
    )
}

/// Ranks interventions for a check-in by aggregating the emotion, quadrant
/// and archetype preference tiers. Pure and deterministic.
pub fn suggest(entry: &MoodLogEntry, archetype: Archetype) -> Vec<InterventionSuggestion> {
    let mut board = ScoreBoard::default();
    board.add_tier(emotion_preferences(entry.emotion), EMOTION_TIER);
    board.add_tier(quadrant_preferences(entry.quadrant), QUADRANT_TIER);
    board.add_tier(profile_of(archetype).intervention_preferences, ARCHETYPE_TIER);

    if entry.intensity.value() >= HIGH_INTENSITY_THRESHOLD {
        board.add(PhysiologicReset, HIGH_INTENSITY_RESET_BONUS);
    }

    board
        .ranked()
        .into_iter()
        .map(|(kind, priority)| InterventionSuggestion {
            kind,
            priority,
            reason: reason_for(kind, entry, archetype),
        })
        .collect()
}

/// Text entry point: validates raw labels against the fixed registries
/// before ranking.
pub fn suggest_labels(
    emotion: &str,
    intensity: u8,
    archetype: &str,
    timestamp: DateTime<FixedOffset>,
) -> Result<Vec<InterventionSuggestion>> {
    let emotion: Emotion = emotion.parse()?;
    let archetype: Archetype = archetype.parse()?;
    let intensity = Intensity::new(intensity)?;
    let entry = MoodLogEntry::new(emotion, intensity, timestamp, None);
    Ok(suggest(&entry, archetype))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_weights_decay_linearly() {
        assert_eq!(EMOTION_TIER.at(0), 10.0);
        assert_eq!(EMOTION_TIER.at(1), 8.0);
        assert_eq!(QUADRANT_TIER.at(2), 3.0);
        assert_eq!(ARCHETYPE_TIER.at(3), 1.0);
        assert_eq!(ARCHETYPE_TIER.at(9), 0.0);
    }

    #[test]
    fn every_quadrant_has_fallbacks() {
        for q in Quadrant::ALL {
            assert!(!quadrant_preferences(q).is_empty());
        }
    }

    #[test]
    fn scoreboard_keeps_first_insertion_on_ties() {
        let mut board = ScoreBoard::default();
        board.add(WildernessJournal, 2.0);
        board.add(GratitudeRitual, 2.0);
        board.add(LovedOneLetter, 5.0);
        let ranked: Vec<_> = board.ranked().into_iter().map(|(k, _)| k).collect();
        assert_eq!(ranked, vec![LovedOneLetter, WildernessJournal, GratitudeRitual]);
    }
}
