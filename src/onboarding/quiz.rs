use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::profile::Archetype;

#[derive(Debug)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: [QuizOption; 4],
}

#[derive(Debug)]
pub struct QuizOption {
    pub text: &'static str,
    pub archetype: Archetype,
}

const fn option(text: &'static str, archetype: Archetype) -> QuizOption {
    QuizOption { text, archetype }
}

pub static QUIZ: [QuizQuestion; 5] = [
    QuizQuestion {
        prompt: "When life gets hard, your first instinct is to...",
        options: [
            option("Charge ahead", Archetype::Warrior),
            option("Seek knowledge", Archetype::Sage),
            option("Reach out to loved ones", Archetype::Lover),
            option("Explore new possibilities", Archetype::Seeker),
        ],
    },
    QuizQuestion {
        prompt: "Where do you feel most alive?",
        options: [
            option("A battlefield or gym", Archetype::Warrior),
            option("A library or workshop", Archetype::Sage),
            option("Home with loved ones", Archetype::Lover),
            option("Outdoors on an adventure", Archetype::Seeker),
        ],
    },
    QuizQuestion {
        prompt: "What gives your life meaning?",
        options: [
            option("Overcoming obstacles", Archetype::Warrior),
            option("Understanding truth", Archetype::Sage),
            option("Building meaningful relationships", Archetype::Lover),
            option("Discovering new horizons", Archetype::Seeker),
        ],
    },
    QuizQuestion {
        prompt: "Which statement resonates most?",
        options: [
            option("Strength comes from discipline", Archetype::Warrior),
            option("Wisdom is a lifelong pursuit", Archetype::Sage),
            option("Love is our greatest healer", Archetype::Lover),
            option("Curiosity leads to growth", Archetype::Seeker),
        ],
    },
    QuizQuestion {
        prompt: "When you feel stuck, you...",
        options: [
            option("Work harder", Archetype::Warrior),
            option("Reflect and analyse", Archetype::Sage),
            option("Reach out to friends or family", Archetype::Lover),
            option("Get out and explore", Archetype::Seeker),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub archetype: Archetype,
    pub scores: HashMap<Archetype, u32>,
}

/// One point per answer. Highest total wins; ties go to the archetype
/// declared first. No answers yields the default archetype.
pub fn score_answers(answers: &[Archetype]) -> QuizOutcome {
    let mut scores: HashMap<Archetype, u32> = Archetype::ALL.iter().map(|a| (*a, 0)).collect();
    for answer in answers {
        *scores.entry(*answer).or_insert(0) += 1;
    }

    let mut winner = Archetype::default();
    let mut best = 0;
    for a in Archetype::ALL {
        let total = scores.get(&a).copied().unwrap_or(0);
        if total > best {
            best = total;
            winner = a;
        }
    }

    QuizOutcome { archetype: winner, scores }
}

/// Scores option indices chosen per question of `QUIZ`. Out-of-range
/// indices are skipped.
pub fn score_choices(choices: &[usize]) -> QuizOutcome {
    let answers: Vec<Archetype> = QUIZ
        .iter()
        .zip(choices)
        .filter_map(|(q, idx)| q.options.get(*idx).map(|o| o.archetype))
        .collect();
    score_answers(&answers)
}
