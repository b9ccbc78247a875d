use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::day::LocalDay;
use super::state::{energy_delta, Ledger, StateKey};
use super::store::KeyValueStore;
use crate::config::CheckInConfig;
use crate::error::Result;
use crate::intervention::{suggest, InterventionSuggestion};
use crate::mood::{Emotion, Intensity, MoodLogEntry};
use crate::profile::{part_ordering, Archetype, Part};
use crate::services::sync::{CheckInRecord, SyncQueue};

pub const MOOD_CHECK_IN_TOKENS: i64 = 1;
pub const MOOD_CHECK_IN_REASON: &str = "Daily mood check-in";
pub const PAIR_COMPLETION_TOKENS: i64 = 2;
pub const PAIR_COMPLETION_REASON: &str = "Completed both mood and part check-in";

/// Read-only view of the manager's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInSnapshot {
    pub self_led_streak: u32,
    pub last_mood_entry_date: Option<NaiveDate>,
    pub last_part_work_date: Option<NaiveDate>,
    pub ubuntu_tokens: u64,
    pub self_energy: u8,
    pub archetype: Archetype,
    pub logged_moods: usize,
}

struct Inner {
    ledger: Ledger,
    /// Keys whose last write failed; re-sent before the next operation.
    dirty: BTreeSet<StateKey>,
}

struct Shared {
    store: Arc<dyn KeyValueStore>,
    day: LocalDay,
    sync: Option<(SyncQueue, String)>,
    inner: Mutex<Inner>,
}

/// Single source of truth for one user's check-in session. Cloning yields
/// another handle onto the same state; operations are serialized.
#[derive(Clone)]
pub struct CheckInManager {
    shared: Arc<Shared>,
}

impl CheckInManager {
    /// Loads prior state from `store`. The handle exists only once loading
    /// has finished, so no operation can observe a half-initialized ledger.
    pub async fn init(store: Arc<dyn KeyValueStore>, config: &CheckInConfig) -> Self {
        Self::build(store, config, None).await
    }

    /// Same as `init`, mirroring every mood check-in through `queue`.
    pub async fn init_with_sync(
        store: Arc<dyn KeyValueStore>,
        config: &CheckInConfig,
        queue: SyncQueue,
        user_id: impl Into<String>,
    ) -> Self {
        Self::build(store, config, Some((queue, user_id.into()))).await
    }

    async fn build(
        store: Arc<dyn KeyValueStore>,
        config: &CheckInConfig,
        sync: Option<(SyncQueue, String)>,
    ) -> Self {
        let ledger = Ledger::load(store.as_ref(), config).await;
        info!(
            streak = ledger.streak.self_led_streak,
            tokens = ledger.tokens.total(),
            energy = ledger.energy.value(),
            archetype = %ledger.archetype,
            moods = ledger.log.len(),
            "Check-in state loaded"
        );

        Self {
            shared: Arc::new(Shared {
                store,
                day: config.local_day(),
                sync,
                inner: Mutex::new(Inner {
                    ledger,
                    dirty: BTreeSet::new(),
                }),
            }),
        }
    }

    pub fn local_day(&self) -> LocalDay {
        self.shared.day
    }

    pub async fn record_mood(
        &self,
        emotion: Emotion,
        intensity: Intensity,
        timestamp: DateTime<FixedOffset>,
    ) -> Vec<InterventionSuggestion> {
        self.record_mood_with_note(emotion, intensity, timestamp, None).await
    }

    /// Logs a check-in, advances streak/energy/tokens, and ranks
    /// interventions against the archetype held at the time of logging.
    pub async fn record_mood_with_note(
        &self,
        emotion: Emotion,
        intensity: Intensity,
        timestamp: DateTime<FixedOffset>,
        note: Option<String>,
    ) -> Vec<InterventionSuggestion> {
        let mut inner = self.shared.inner.lock().await;
        self.retry_dirty(&mut inner).await;

        // a. append
        let entry = MoodLogEntry::new(emotion, intensity, timestamp, note);
        if let Some(last) = inner.ledger.log.latest() {
            if last.timestamp > entry.timestamp {
                warn!(
                    previous = %last.timestamp,
                    current = %entry.timestamp,
                    "Mood timestamp is older than the newest logged entry"
                );
            }
        }
        let archetype = inner.ledger.archetype;
        let evicted = inner.ledger.log.push(entry.clone());
        if !evicted.is_empty() {
            debug!(evicted = evicted.len(), "Mood log at capacity, dropped oldest");
        }
        self.persist(&mut inner, StateKey::MoodLogs).await;

        // b. streak
        let today = self.shared.day.date_of(&timestamp);
        if inner.ledger.streak.mark_mood(today) {
            info!(
                streak = inner.ledger.streak.self_led_streak,
                %today,
                "Self-led streak advanced by mood check-in"
            );
            self.persist(&mut inner, StateKey::SelfLedStreak).await;
        }
        self.persist(&mut inner, StateKey::LastMoodDate).await;

        // c. energy
        let delta = energy_delta(entry.quadrant, entry.intensity);
        let before = inner.ledger.energy;
        inner.ledger.energy = before.apply(delta);
        debug!(
            delta,
            from = before.value(),
            to = inner.ledger.energy.value(),
            "Self energy adjusted"
        );
        self.persist(&mut inner, StateKey::SelfEnergy).await;

        // d. tokens
        if let Err(e) = self
            .award_locked(&mut inner, MOOD_CHECK_IN_TOKENS, MOOD_CHECK_IN_REASON)
            .await
        {
            warn!("Mood check-in award rejected: {}", e);
        }

        if let Some((queue, user_id)) = &self.shared.sync {
            let record = CheckInRecord::from_entry(
                user_id,
                &entry,
                archetype,
                inner.ledger.tokens.total(),
                inner.ledger.streak.self_led_streak,
            );
            queue.enqueue(record);
        }

        drop(inner);
        suggest(&entry, archetype)
    }

    /// Marks part work for the day of `timestamp`; completing the day's pair
    /// advances the streak and pays the pair bonus.
    pub async fn record_part_work(&self, timestamp: DateTime<FixedOffset>) {
        let mut inner = self.shared.inner.lock().await;
        self.retry_dirty(&mut inner).await;

        let today = self.shared.day.date_of(&timestamp);
        if inner.ledger.streak.mark_part_work(today) {
            info!(
                streak = inner.ledger.streak.self_led_streak,
                %today,
                "Self-led streak advanced by part work"
            );
            self.persist(&mut inner, StateKey::SelfLedStreak).await;
            if let Err(e) = self
                .award_locked(&mut inner, PAIR_COMPLETION_TOKENS, PAIR_COMPLETION_REASON)
                .await
            {
                warn!("Pair completion award rejected: {}", e);
            }
        }
        self.persist(&mut inner, StateKey::LastPartDate).await;
    }

    pub async fn award_token(&self, amount: i64, reason: &str) -> Result<u64> {
        let mut inner = self.shared.inner.lock().await;
        self.retry_dirty(&mut inner).await;
        self.award_locked(&mut inner, amount, reason).await
    }

    /// Insertion order, oldest first.
    pub async fn mood_logs(&self) -> Vec<MoodLogEntry> {
        self.shared.inner.lock().await.ledger.log.to_vec()
    }

    /// Stores the onboarding result. Check-ins already in flight keep the
    /// archetype they started with.
    pub async fn set_archetype(&self, archetype: Archetype) {
        let mut inner = self.shared.inner.lock().await;
        self.retry_dirty(&mut inner).await;
        if inner.ledger.archetype != archetype {
            info!(from = %inner.ledger.archetype, to = %archetype, "Archetype changed");
        }
        inner.ledger.archetype = archetype;
        self.persist(&mut inner, StateKey::Archetype).await;
    }

    pub async fn archetype(&self) -> Archetype {
        self.shared.inner.lock().await.ledger.archetype
    }

    /// Parts ordered for the current archetype.
    pub async fn part_ordering(&self) -> Vec<Part> {
        part_ordering(self.archetype().await)
    }

    pub async fn snapshot(&self) -> CheckInSnapshot {
        let inner = self.shared.inner.lock().await;
        let l = &inner.ledger;
        CheckInSnapshot {
            self_led_streak: l.streak.self_led_streak,
            last_mood_entry_date: l.streak.last_mood_entry_date,
            last_part_work_date: l.streak.last_part_work_date,
            ubuntu_tokens: l.tokens.total(),
            self_energy: l.energy.value(),
            archetype: l.archetype,
            logged_moods: l.log.len(),
        }
    }

    /// Re-sends keys whose last write failed. Returns how many are still
    /// pending afterwards.
    pub async fn flush(&self) -> usize {
        let mut inner = self.shared.inner.lock().await;
        self.retry_dirty(&mut inner).await;
        inner.dirty.len()
    }

    pub async fn pending_writes(&self) -> Vec<&'static str> {
        let inner = self.shared.inner.lock().await;
        inner.dirty.iter().map(|k| k.as_str()).collect()
    }

    async fn award_locked(&self, inner: &mut Inner, amount: i64, reason: &str) -> Result<u64> {
        let total = inner.ledger.tokens.award(amount)?;
        info!(amount, total, reason, "Awarded Ubuntu token(s)");
        self.persist(inner, StateKey::UbuntuTokens).await;
        Ok(total)
    }

    async fn retry_dirty(&self, inner: &mut Inner) {
        if inner.dirty.is_empty() {
            return;
        }
        let pending: Vec<StateKey> = inner.dirty.iter().copied().collect();
        debug!(count = pending.len(), "Retrying failed writes");
        for key in pending {
            self.persist(inner, key).await;
        }
    }

    /// Writes the whole current value of `key`. Failures are logged and
    /// remembered; in-memory state stays authoritative.
    async fn persist(&self, inner: &mut Inner, key: StateKey) {
        let value = match inner.ledger.encode(key) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = key.as_str(), operation = "encode", "Failed to serialize state: {}", e);
                inner.dirty.insert(key);
                return;
            }
        };
        match self.shared.store.set(key.as_str(), value).await {
            Ok(()) => {
                inner.dirty.remove(&key);
            }
            Err(e) => {
                warn!(key = key.as_str(), operation = "set", "Failed to persist state: {}", e);
                inner.dirty.insert(key);
            }
        }
    }
}
