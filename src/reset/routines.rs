use crate::intervention::InterventionKind;
use crate::mood::Intensity;

/// A guided somatic reset: a countdown plus a looping list of steps.
#[derive(Debug)]
pub struct ResetRoutine {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub duration_secs: u32,
    /// How long each instruction stays on screen.
    pub step_interval_secs: u32,
    pub steps: &'static [&'static str],
}

pub static ROUTINES: [ResetRoutine; 3] = [
    ResetRoutine {
        key: "sigh",
        title: "Physiologic Sigh",
        description: "Release tension in 30 sec.",
        duration_secs: 30,
        step_interval_secs: 4,
        steps: &[
            "Inhale deeply through your nose",
            "Take another quick sip of air",
            "Exhale slowly through your mouth",
        ],
    },
    ResetRoutine {
        key: "nostril",
        title: "Alternate Nostril Breathing",
        description: "Reset mind & body in 1 min.",
        duration_secs: 60,
        step_interval_secs: 4,
        steps: &[
            "Place your thumb on your right nostril",
            "Inhale through your left nostril",
            "Block your left nostril with your ring finger",
            "Release your thumb and exhale through right nostril",
            "Inhale through your right nostril",
            "Block your right nostril with your thumb",
            "Release your ring finger and exhale through left nostril",
        ],
    },
    ResetRoutine {
        key: "eft",
        title: "EFT Tapping",
        description: "Calm your nerves in 90 sec.",
        duration_secs: 90,
        step_interval_secs: 9,
        steps: &[
            "Tap the side of your hand (karate chop)",
            "Tap the top of your head",
            "Tap your eyebrow point",
            "Tap the side of your eye",
            "Tap under your eye",
            "Tap under your nose",
            "Tap your chin point",
            "Tap your collarbone",
            "Tap under your arm",
            "Tap the top of your head",
        ],
    },
];

pub fn routine(key: &str) -> Option<&'static ResetRoutine> {
    ROUTINES.iter().find(|r| r.key == key)
}

/// Reset to open when the top suggestion is a physiologic reset. Intense
/// states get the shortest routine.
pub fn routine_for(kind: InterventionKind, intensity: Intensity) -> Option<&'static ResetRoutine> {
    if !kind.is_timed_reset() {
        return None;
    }
    match intensity.value() {
        4..=5 => routine("sigh"),
        3 => routine("nostril"),
        _ => routine("eft"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_resolve() {
        for r in ROUTINES.iter() {
            assert!(std::ptr::eq(routine(r.key).unwrap(), r));
            assert!(!r.steps.is_empty());
        }
        assert!(routine("box").is_none());
    }

    #[test]
    fn writing_prompts_have_no_timer() {
        let i = Intensity::new(5).unwrap();
        assert!(routine_for(InterventionKind::WildernessJournal, i).is_none());
        assert_eq!(routine_for(InterventionKind::PhysiologicReset, i).unwrap().key, "sigh");
    }
}
