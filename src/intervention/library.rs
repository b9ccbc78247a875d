use serde::Serialize;

use super::types::InterventionKind;
use crate::profile::Archetype;

/// A concrete written practice: what to show once a suggestion is picked.
#[derive(Debug, Serialize)]
pub struct Intervention {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub archetype: Archetype,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

use Archetype::{Lover, Sage, Seeker, Warrior};
use InterventionKind::{GratitudeRitual, LovedOneLetter, WildernessJournal};

const fn practice(
    id: &'static str,
    kind: InterventionKind,
    archetype: Archetype,
    title: &'static str,
    description: &'static str,
    prompt: &'static str,
) -> Intervention {
    Intervention { id, kind, archetype, title, description, prompt }
}

/// One letter, journal and gratitude ritual per archetype. Physiologic
/// resets live in `crate::reset` instead.
pub static LIBRARY: [Intervention; 12] = [
    practice(
        "warrior-letter",
        LovedOneLetter,
        Warrior,
        "Letter to Your Inner Warrior",
        "Write a letter acknowledging your strength and courage",
        "Dear Warrior,\n\nI honor your courage and determination. Today I want to acknowledge...",
    ),
    practice(
        "warrior-journal",
        WildernessJournal,
        Warrior,
        "Warrior Journal: Victories & Challenges",
        "Reflect on your recent victories and ongoing battles",
        "What battles have I fought this week? What victories can I celebrate? Where do I need to gather my strength?",
    ),
    practice(
        "warrior-ubuntu",
        GratitudeRitual,
        Warrior,
        "Warrior Ubuntu Ritual",
        "A grounding practice for the warrior spirit",
        "Stand tall. Place your hand on your heart. Say aloud: \"I am strong. I am capable. I fight for what matters.\" Take three deep breaths, feeling your inner strength.",
    ),
    practice(
        "sage-letter",
        LovedOneLetter,
        Sage,
        "Letter to Your Inner Sage",
        "Write to the wise part of yourself",
        "Dear Sage,\n\nI seek your wisdom and clarity. What truth do I need to hear today?",
    ),
    practice(
        "sage-journal",
        WildernessJournal,
        Sage,
        "Sage Journal: Insights & Learnings",
        "Document your insights and lessons learned",
        "What have I learned recently? What patterns am I noticing? What wisdom wants to emerge?",
    ),
    practice(
        "sage-ubuntu",
        GratitudeRitual,
        Sage,
        "Sage Ubuntu Ritual",
        "A contemplative practice for wisdom",
        "Sit comfortably. Close your eyes. Place your hand on your third eye. Say silently: \"I trust my inner wisdom. I see clearly.\" Breathe and listen to what arises.",
    ),
    practice(
        "lover-letter",
        LovedOneLetter,
        Lover,
        "Letter to Your Inner Lover",
        "Connect with your heart and capacity for love",
        "Dear Lover,\n\nI honor my capacity for connection and compassion. Today I open my heart to...",
    ),
    practice(
        "lover-journal",
        WildernessJournal,
        Lover,
        "Lover Journal: Connections & Heart",
        "Reflect on your relationships and emotional landscape",
        "Who am I connected to? What relationships nourish me? Where can I offer more love - to myself or others?",
    ),
    practice(
        "lover-ubuntu",
        GratitudeRitual,
        Lover,
        "Lover Ubuntu Ritual",
        "A heart-opening practice",
        "Place both hands on your heart. Feel its rhythm. Say gently: \"I am love. I am worthy of love. I belong.\" Breathe into your heart space, expanding with each breath.",
    ),
    practice(
        "seeker-letter",
        LovedOneLetter,
        Seeker,
        "Letter to Your Inner Seeker",
        "Write to your adventurous, curious self",
        "Dear Seeker,\n\nI honor my curiosity and desire for growth. What new path are you calling me toward?",
    ),
    practice(
        "seeker-journal",
        WildernessJournal,
        Seeker,
        "Seeker Journal: Questions & Exploration",
        "Explore your questions and new discoveries",
        "What am I curious about? What new territory am I exploring? What questions are alive in me right now?",
    ),
    practice(
        "seeker-ubuntu",
        GratitudeRitual,
        Seeker,
        "Seeker Ubuntu Ritual",
        "A practice for opening to possibility",
        "Stand with arms open wide. Look toward the horizon. Say aloud: \"I am open. I am ready. I embrace the unknown.\" Take three expansive breaths, welcoming what comes next.",
    ),
];

/// Practices written for `archetype`, in library order.
pub fn for_archetype(archetype: Archetype) -> Vec<&'static Intervention> {
    LIBRARY.iter().filter(|i| i.archetype == archetype).collect()
}

/// The practice to open for a suggested kind. `None` for timed resets.
pub fn practice_for(kind: InterventionKind, archetype: Archetype) -> Option<&'static Intervention> {
    LIBRARY.iter().find(|i| i.kind == kind && i.archetype == archetype)
}
