use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

use super::store::KeyValueStore;
use crate::config::CheckInConfig;
use crate::error::{CheckInError, Result, StoreError};
use crate::mood::{Intensity, MoodLogEntry, Quadrant};
use crate::profile::Archetype;

/// Logical keys of the persisted layout. Each value is stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    MoodLogs,
    SelfLedStreak,
    LastMoodDate,
    LastPartDate,
    UbuntuTokens,
    SelfEnergy,
    Archetype,
}

impl StateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::MoodLogs => "moodLogs",
            StateKey::SelfLedStreak => "selfLedStreak",
            StateKey::LastMoodDate => "lastMoodDate",
            StateKey::LastPartDate => "lastPartDate",
            StateKey::UbuntuTokens => "ubuntuTokens",
            StateKey::SelfEnergy => "selfEnergy",
            StateKey::Archetype => "archetype",
        }
    }
}

/// Self-led streak bookkeeping. The count moves only when the second half of
/// a day's mood + part pair lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub self_led_streak: u32,
    pub last_mood_entry_date: Option<NaiveDate>,
    pub last_part_work_date: Option<NaiveDate>,
}

impl StreakState {
    /// Records a mood on `day`. Returns whether this completed the pair.
    pub fn mark_mood(&mut self, day: NaiveDate) -> bool {
        let completes =
            self.last_part_work_date == Some(day) && self.last_mood_entry_date != Some(day);
        if completes {
            self.self_led_streak = self.self_led_streak.saturating_add(1);
        }
        self.last_mood_entry_date = Some(day);
        completes
    }

    /// Records part work on `day`. Returns whether this completed the pair.
    pub fn mark_part_work(&mut self, day: NaiveDate) -> bool {
        let completes =
            self.last_mood_entry_date == Some(day) && self.last_part_work_date != Some(day);
        if completes {
            self.self_led_streak = self.self_led_streak.saturating_add(1);
        }
        self.last_part_work_date = Some(day);
        completes
    }
}

/// Self energy gauge, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnergyLevel(u8);

impl EnergyLevel {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;
    pub const INITIAL: EnergyLevel = EnergyLevel(50);

    pub fn clamped(value: i64) -> Self {
        EnergyLevel(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn apply(&self, delta: i32) -> Self {
        Self::clamped(self.0 as i64 + delta as i64)
    }
}

impl Default for EnergyLevel {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Energy change for a check-in. Pleasant states gain more than unpleasant
/// states of equal intensity lose.
pub fn energy_delta(quadrant: Quadrant, intensity: Intensity) -> i32 {
    let i = intensity.value() as i32;
    match quadrant {
        Quadrant::HighPleasant => 5 + i,
        Quadrant::LowPleasant => 3 + i,
        Quadrant::HighUnpleasant => -(2 + i),
        Quadrant::LowUnpleasant => -(3 + i),
    }
}

/// Ubuntu token total. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenLedger {
    total: u64,
}

impl TokenLedger {
    pub fn with_total(total: u64) -> Self {
        Self { total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn award(&mut self, amount: i64) -> Result<u64> {
        if amount <= 0 {
            return Err(CheckInError::InvalidAmount(amount));
        }
        self.total = self.total.saturating_add(amount as u64);
        Ok(self.total)
    }
}

/// Insertion-ordered mood history with a retention cap.
#[derive(Debug, Clone)]
pub struct MoodLog {
    entries: VecDeque<MoodLogEntry>,
    capacity: usize,
}

impl MoodLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn from_entries(entries: Vec<MoodLogEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    /// Appends and returns whatever fell off the front.
    pub fn push(&mut self, entry: MoodLogEntry) -> Vec<MoodLogEntry> {
        self.entries.push_back(entry);
        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(old) = self.entries.pop_front() {
                evicted.push(old);
            }
        }
        evicted
    }

    pub fn latest(&self) -> Option<&MoodLogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<MoodLogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Everything the manager owns for one user session.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub log: MoodLog,
    pub streak: StreakState,
    pub tokens: TokenLedger,
    pub energy: EnergyLevel,
    pub archetype: Archetype,
}

impl Ledger {
    pub fn fresh(config: &CheckInConfig) -> Self {
        Self {
            log: MoodLog::new(config.log_capacity),
            streak: StreakState::default(),
            tokens: TokenLedger::default(),
            energy: EnergyLevel::INITIAL,
            archetype: config.default_archetype,
        }
    }

    /// Reads every key; absent or unreadable values fall back to defaults.
    pub async fn load(store: &dyn KeyValueStore, config: &CheckInConfig) -> Self {
        let mut ledger = Self::fresh(config);

        if let Some(raw) = read(store, StateKey::MoodLogs).await {
            match serde_json::from_str::<Vec<MoodLogEntry>>(&raw) {
                Ok(entries) => ledger.log = MoodLog::from_entries(entries, config.log_capacity),
                Err(e) => warn!(
                    key = StateKey::MoodLogs.as_str(),
                    "Discarding unreadable mood log: {}",
                    e
                ),
            }
        }
        if let Some(v) = read_parsed::<u32>(store, StateKey::SelfLedStreak).await {
            ledger.streak.self_led_streak = v;
        }
        ledger.streak.last_mood_entry_date =
            read_parsed::<NaiveDate>(store, StateKey::LastMoodDate).await;
        ledger.streak.last_part_work_date =
            read_parsed::<NaiveDate>(store, StateKey::LastPartDate).await;
        if let Some(v) = read_parsed::<u64>(store, StateKey::UbuntuTokens).await {
            ledger.tokens = TokenLedger::with_total(v);
        }
        if let Some(v) = read_parsed::<i64>(store, StateKey::SelfEnergy).await {
            ledger.energy = EnergyLevel::clamped(v);
        }
        if let Some(v) = read_parsed::<Archetype>(store, StateKey::Archetype).await {
            ledger.archetype = v;
        }

        ledger
    }

    /// Serialized value of `key` as it should sit in the store.
    pub fn encode(&self, key: StateKey) -> Result<String, StoreError> {
        let value = match key {
            StateKey::MoodLogs => serde_json::to_string(&self.log.to_vec())?,
            StateKey::SelfLedStreak => self.streak.self_led_streak.to_string(),
            StateKey::LastMoodDate => date_string(self.streak.last_mood_entry_date),
            StateKey::LastPartDate => date_string(self.streak.last_part_work_date),
            StateKey::UbuntuTokens => self.tokens.total().to_string(),
            StateKey::SelfEnergy => self.energy.value().to_string(),
            StateKey::Archetype => self.archetype.label().to_string(),
        };
        Ok(value)
    }
}

fn date_string(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

async fn read(store: &dyn KeyValueStore, key: StateKey) -> Option<String> {
    match store.get(key.as_str()).await {
        Ok(Some(raw)) if !raw.trim().is_empty() => Some(raw),
        Ok(_) => None,
        Err(e) => {
            warn!(key = key.as_str(), operation = "get", "Store read failed: {}", e);
            None
        }
    }
}

async fn read_parsed<T>(store: &dyn KeyValueStore, key: StateKey) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = read(store, key).await?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key = key.as_str(), "Ignoring unparseable stored value {:?}: {}", raw, e);
            None
        }
    }
}
