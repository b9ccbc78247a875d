use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CheckInError, Result};

/// Circumplex quadrant: arousal (high/low) x valence (pleasant/unpleasant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quadrant {
    HighPleasant,
    HighUnpleasant,
    LowUnpleasant,
    LowPleasant,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighPleasant,
        Quadrant::HighUnpleasant,
        Quadrant::LowUnpleasant,
        Quadrant::LowPleasant,
    ];
}

/// The closed set of emotions offered by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    // High arousal, pleasant
    Excited,
    Energized,
    Joyful,
    Happy,
    Enthusiastic,
    Inspired,
    // High arousal, unpleasant
    Anxious,
    Angry,
    Stressed,
    Frustrated,
    Irritated,
    Overwhelmed,
    // Low arousal, unpleasant
    Sad,
    Depressed,
    Lonely,
    Hopeless,
    Tired,
    Disconnected,
    // Low arousal, pleasant
    Calm,
    Peaceful,
    Content,
    Relaxed,
    Serene,
    Grounded,
}

impl Emotion {
    pub const ALL: [Emotion; 24] = [
        Emotion::Excited,
        Emotion::Energized,
        Emotion::Joyful,
        Emotion::Happy,
        Emotion::Enthusiastic,
        Emotion::Inspired,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Stressed,
        Emotion::Frustrated,
        Emotion::Irritated,
        Emotion::Overwhelmed,
        Emotion::Sad,
        Emotion::Depressed,
        Emotion::Lonely,
        Emotion::Hopeless,
        Emotion::Tired,
        Emotion::Disconnected,
        Emotion::Calm,
        Emotion::Peaceful,
        Emotion::Content,
        Emotion::Relaxed,
        Emotion::Serene,
        Emotion::Grounded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Excited => "excited",
            Emotion::Energized => "energized",
            Emotion::Joyful => "joyful",
            Emotion::Happy => "happy",
            Emotion::Enthusiastic => "enthusiastic",
            Emotion::Inspired => "inspired",
            Emotion::Anxious => "anxious",
            Emotion::Angry => "angry",
            Emotion::Stressed => "stressed",
            Emotion::Frustrated => "frustrated",
            Emotion::Irritated => "irritated",
            Emotion::Overwhelmed => "overwhelmed",
            Emotion::Sad => "sad",
            Emotion::Depressed => "depressed",
            Emotion::Lonely => "lonely",
            Emotion::Hopeless => "hopeless",
            Emotion::Tired => "tired",
            Emotion::Disconnected => "disconnected",
            Emotion::Calm => "calm",
            Emotion::Peaceful => "peaceful",
            Emotion::Content => "content",
            Emotion::Relaxed => "relaxed",
            Emotion::Serene => "serene",
            Emotion::Grounded => "grounded",
        }
    }

    pub fn quadrant(&self) -> Quadrant {
        quadrant_of(*self)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Emotion {
    type Err = CheckInError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Emotion::ALL
            .iter()
            .copied()
            .find(|e| e.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CheckInError::UnknownEmotion(s.to_string()))
    }
}

/// Fixed emotion -> quadrant lookup. Total over `Emotion`.
pub fn quadrant_of(emotion: Emotion) -> Quadrant {
    use Emotion::*;
    match emotion {
        Excited | Energized | Joyful | Happy | Enthusiastic | Inspired => Quadrant::HighPleasant,
        Anxious | Angry | Stressed | Frustrated | Irritated | Overwhelmed => Quadrant::HighUnpleasant,
        Sad | Depressed | Lonely | Hopeless | Tired | Disconnected => Quadrant::LowUnpleasant,
        Calm | Peaceful | Content | Relaxed | Serene | Grounded => Quadrant::LowPleasant,
    }
}

/// Text entry point for callers holding a raw label (e.g. from a form).
pub fn quadrant_of_label(label: &str) -> Result<Quadrant> {
    label.parse::<Emotion>().map(quadrant_of)
}

/// How strongly the emotion is felt. 1 = faint, 5 = overwhelming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Intensity(value))
        } else {
            Err(CheckInError::InvalidIntensity(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn band(&self) -> IntensityBand {
        match self.0 {
            0..=2 => IntensityBand::Mild,
            3 => IntensityBand::Moderate,
            _ => IntensityBand::Intense,
        }
    }
}

impl TryFrom<u8> for Intensity {
    type Error = CheckInError;

    fn try_from(value: u8) -> Result<Self> {
        Intensity::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(i: Intensity) -> u8 {
        i.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBand {
    Mild,
    Moderate,
    Intense,
}

impl IntensityBand {
    pub fn label(&self) -> &'static str {
        match self {
            IntensityBand::Mild => "mild",
            IntensityBand::Moderate => "moderate",
            IntensityBand::Intense => "intense",
        }
    }
}

/// One check-in. Immutable once created; the quadrant is always derived
/// from the emotion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLogEntry {
    pub emotion: Emotion,
    pub quadrant: Quadrant,
    pub intensity: Intensity,
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodLogEntry {
    pub fn new(
        emotion: Emotion,
        intensity: Intensity,
        timestamp: DateTime<FixedOffset>,
        note: Option<String>,
    ) -> Self {
        Self {
            emotion,
            quadrant: quadrant_of(emotion),
            intensity,
            timestamp,
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_emotion_maps_to_one_quadrant() {
        for q in Quadrant::ALL {
            let count = Emotion::ALL.iter().filter(|e| quadrant_of(**e) == q).count();
            assert_eq!(count, 6, "{:?} should hold six emotions", q);
        }
    }

    #[test]
    fn labels_parse_back_case_insensitively() {
        for e in Emotion::ALL {
            assert_eq!(e.label().to_uppercase().parse::<Emotion>().unwrap(), e);
        }
        assert_eq!(
            quadrant_of_label("curious"),
            Err(CheckInError::UnknownEmotion("curious".to_string()))
        );
    }

    #[test]
    fn intensity_range_and_bands() {
        assert!(Intensity::new(0).is_err());
        assert!(Intensity::new(6).is_err());
        assert_eq!(Intensity::new(2).unwrap().band(), IntensityBand::Mild);
        assert_eq!(Intensity::new(3).unwrap().band(), IntensityBand::Moderate);
        assert_eq!(Intensity::new(4).unwrap().band(), IntensityBand::Intense);
    }

    #[test]
    fn entry_serializes_with_source_field_shapes() {
        let ts = DateTime::parse_from_rfc3339("2025-03-01T09:30:00+02:00").unwrap();
        let entry = MoodLogEntry::new(Emotion::Anxious, Intensity::new(4).unwrap(), ts, None);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["emotion"], "anxious");
        assert_eq!(json["quadrant"], "HIGH_UNPLEASANT");
        assert_eq!(json["intensity"], 4);
        assert!(json.get("note").is_none());
    }
}
