use chrono::{DateTime, FixedOffset, NaiveDate};
use std::sync::Arc;
use taru::checkin::{CheckInManager, FileStore, KeyValueStore, MemoryStore};
use taru::config::CheckInConfig;
use taru::error::CheckInError;
use taru::intervention::InterventionKind;
use taru::mood::{Emotion, Intensity};
use taru::profile::{Archetype, Part};

fn ts(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

fn level(n: u8) -> Intensity {
    Intensity::new(n).unwrap()
}

async fn fresh() -> (Arc<MemoryStore>, CheckInManager) {
    let store = Arc::new(MemoryStore::new());
    let manager = CheckInManager::init(store.clone(), &CheckInConfig::default()).await;
    (store, manager)
}

#[tokio::test]
async fn test_init_defaults_on_empty_store() {
    let (_store, manager) = fresh().await;
    let snap = manager.snapshot().await;

    assert_eq!(snap.self_led_streak, 0);
    assert_eq!(snap.ubuntu_tokens, 0);
    assert_eq!(snap.self_energy, 50);
    assert_eq!(snap.archetype, Archetype::Warrior);
    assert_eq!(snap.last_mood_entry_date, None);
    assert!(manager.mood_logs().await.is_empty());
}

#[tokio::test]
async fn test_init_loads_prior_state_and_tolerates_garbage() {
    let store = Arc::new(MemoryStore::with_entries([
        ("selfLedStreak", "4"),
        ("ubuntuTokens", "17"),
        ("selfEnergy", "250"),
        ("archetype", "Lover"),
        ("lastMoodDate", "2025-02-03"),
        ("lastPartDate", "not-a-date"),
        ("moodLogs", "{broken"),
    ]));
    let manager = CheckInManager::init(store, &CheckInConfig::default()).await;
    let snap = manager.snapshot().await;

    assert_eq!(snap.self_led_streak, 4);
    assert_eq!(snap.ubuntu_tokens, 17);
    assert_eq!(snap.self_energy, 100, "Out-of-range energy should be clamped on load");
    assert_eq!(snap.archetype, Archetype::Lover);
    assert_eq!(snap.last_mood_entry_date, NaiveDate::from_ymd_opt(2025, 2, 3));
    assert_eq!(snap.last_part_work_date, None);
    assert_eq!(snap.logged_moods, 0);
}

#[tokio::test]
async fn test_unknown_stored_archetype_falls_back_to_default() {
    let store = Arc::new(MemoryStore::with_entries([("archetype", "Jester")]));
    let manager = CheckInManager::init(store, &CheckInConfig::default()).await;
    assert_eq!(manager.archetype().await, Archetype::Warrior);
}

#[tokio::test]
async fn test_record_mood_persists_every_key() {
    let (store, manager) = fresh().await;

    let suggestions = manager
        .record_mood(Emotion::Happy, level(3), ts("2025-03-10T08:00:00Z"))
        .await;
    assert!(!suggestions.is_empty());

    assert_eq!(store.raw("selfEnergy").as_deref(), Some("58"));
    assert_eq!(store.raw("ubuntuTokens").as_deref(), Some("1"));
    assert_eq!(store.raw("lastMoodDate").as_deref(), Some("2025-03-10"));
    assert_eq!(store.raw("selfLedStreak"), None, "Streak is only written when it moves");

    let logs: serde_json::Value = serde_json::from_str(&store.raw("moodLogs").unwrap()).unwrap();
    assert_eq!(logs[0]["emotion"], "happy");
    assert_eq!(logs[0]["quadrant"], "HIGH_PLEASANT");
}

#[tokio::test]
async fn test_energy_stays_in_bounds() {
    let (_store, manager) = fresh().await;
    let day = ts("2025-03-10T08:00:00Z");

    for _ in 0..20 {
        manager.record_mood(Emotion::Stressed, level(5), day).await;
        let e = manager.snapshot().await.self_energy;
        assert!(e <= 100);
    }
    assert_eq!(manager.snapshot().await.self_energy, 0);

    // Already at the floor: more unpleasant check-ins keep it there.
    manager.record_mood(Emotion::Anxious, level(5), day).await;
    assert_eq!(manager.snapshot().await.self_energy, 0);

    for _ in 0..20 {
        manager.record_mood(Emotion::Excited, level(5), day).await;
    }
    assert_eq!(manager.snapshot().await.self_energy, 100);
}

#[tokio::test]
async fn test_low_unpleasant_costs_more_than_high_unpleasant() {
    let (_a, high) = fresh().await;
    let (_b, low) = fresh().await;
    let t = ts("2025-03-10T08:00:00Z");

    high.record_mood(Emotion::Angry, level(2), t).await;
    low.record_mood(Emotion::Sad, level(2), t).await;

    assert_eq!(high.snapshot().await.self_energy, 46);
    assert_eq!(low.snapshot().await.self_energy, 45);
}

#[tokio::test]
async fn test_streak_needs_mood_and_part_on_same_day() {
    let (_store, manager) = fresh().await;

    manager.record_mood(Emotion::Calm, level(2), ts("2025-03-10T08:00:00Z")).await;
    manager.record_mood(Emotion::Calm, level(2), ts("2025-03-10T12:00:00Z")).await;
    assert_eq!(manager.snapshot().await.self_led_streak, 0, "Two moods alone never count");

    manager.record_part_work(ts("2025-03-10T20:00:00Z")).await;
    let snap = manager.snapshot().await;
    assert_eq!(snap.self_led_streak, 1);
    // 1 + 1 for moods, 2 for completing the pair
    assert_eq!(snap.ubuntu_tokens, 4);

    manager.record_part_work(ts("2025-03-10T21:00:00Z")).await;
    manager.record_mood(Emotion::Calm, level(2), ts("2025-03-10T22:00:00Z")).await;
    let snap = manager.snapshot().await;
    assert_eq!(snap.self_led_streak, 1, "At most one increment per day");
    assert_eq!(snap.ubuntu_tokens, 5);
}

#[tokio::test]
async fn test_part_first_then_mood_completes_the_pair() {
    let (store, manager) = fresh().await;

    manager.record_part_work(ts("2025-03-11T07:00:00Z")).await;
    assert_eq!(manager.snapshot().await.self_led_streak, 0);

    manager.record_mood(Emotion::Inspired, level(4), ts("2025-03-11T09:00:00Z")).await;
    let snap = manager.snapshot().await;
    assert_eq!(snap.self_led_streak, 1);
    // Mood-completed pairs only pay the mood award.
    assert_eq!(snap.ubuntu_tokens, 1);
    assert_eq!(store.raw("selfLedStreak").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_streak_survives_a_gap_day() {
    let (_store, manager) = fresh().await;

    manager.record_mood(Emotion::Calm, level(1), ts("2025-03-10T08:00:00Z")).await;
    manager.record_part_work(ts("2025-03-10T09:00:00Z")).await;
    manager.record_mood(Emotion::Calm, level(1), ts("2025-03-13T08:00:00Z")).await;
    manager.record_part_work(ts("2025-03-13T09:00:00Z")).await;

    assert_eq!(manager.snapshot().await.self_led_streak, 2);
}

#[tokio::test]
async fn test_day_boundary_follows_configured_offset() {
    let store = Arc::new(MemoryStore::new());
    let config = CheckInConfig {
        utc_offset_minutes: -300,
        ..CheckInConfig::default()
    };
    let manager = CheckInManager::init(store, &config).await;

    // 03:00Z on the 11th is still the evening of the 10th at UTC-5.
    manager.record_mood(Emotion::Tired, level(2), ts("2025-03-11T03:00:00Z")).await;
    manager.record_part_work(ts("2025-03-10T21:00:00-05:00")).await;

    let snap = manager.snapshot().await;
    assert_eq!(snap.last_mood_entry_date, NaiveDate::from_ymd_opt(2025, 3, 10));
    assert_eq!(snap.self_led_streak, 1);
}

#[tokio::test]
async fn test_award_token_rejects_non_positive_amounts() {
    let (_store, manager) = fresh().await;
    manager.award_token(3, "Wrote a loved-one letter").await.unwrap();

    assert_eq!(manager.award_token(-1, "x").await, Err(CheckInError::InvalidAmount(-1)));
    assert_eq!(manager.award_token(0, "x").await, Err(CheckInError::InvalidAmount(0)));
    assert_eq!(manager.snapshot().await.ubuntu_tokens, 3);
}

#[tokio::test]
async fn test_log_cap_evicts_exactly_the_oldest() {
    let (store, manager) = fresh().await;
    let base = ts("2025-01-01T00:00:00Z");

    for i in 0..101 {
        let t = base + chrono::Duration::minutes(i);
        manager.record_mood(Emotion::Content, level(1), t).await;
    }

    let logs = manager.mood_logs().await;
    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0].timestamp, base + chrono::Duration::minutes(1));
    assert_eq!(logs[99].timestamp, base + chrono::Duration::minutes(100));

    let stored: Vec<serde_json::Value> = serde_json::from_str(&store.raw("moodLogs").unwrap()).unwrap();
    assert_eq!(stored.len(), 100);
}

#[tokio::test]
async fn test_logs_keep_insertion_order_and_notes() {
    let (_store, manager) = fresh().await;
    manager
        .record_mood_with_note(Emotion::Lonely, level(3), ts("2025-03-10T08:00:00Z"), Some("quiet house".into()))
        .await;
    // Out-of-order timestamp is accepted as-is.
    manager.record_mood(Emotion::Joyful, level(2), ts("2025-03-09T08:00:00Z")).await;

    let logs = manager.mood_logs().await;
    assert_eq!(logs[0].emotion, Emotion::Lonely);
    assert_eq!(logs[0].note.as_deref(), Some("quiet house"));
    assert_eq!(logs[1].emotion, Emotion::Joyful);
}

#[tokio::test]
async fn test_store_failure_does_not_block_and_is_retried() {
    let (store, manager) = fresh().await;
    store.set_fail_writes(true);

    let suggestions = manager
        .record_mood(Emotion::Overwhelmed, level(5), ts("2025-03-10T08:00:00Z"))
        .await;
    assert_eq!(suggestions[0].kind, InterventionKind::PhysiologicReset);

    let snap = manager.snapshot().await;
    assert_eq!(snap.self_energy, 43);
    assert_eq!(snap.ubuntu_tokens, 1);
    assert!(store.raw("selfEnergy").is_none());
    assert!(manager.pending_writes().await.contains(&"selfEnergy"));

    store.set_fail_writes(false);
    // Next operation re-sends the pending keys first.
    manager.record_part_work(ts("2025-03-10T09:00:00Z")).await;

    assert!(manager.pending_writes().await.is_empty());
    assert_eq!(store.raw("selfEnergy").as_deref(), Some("43"));
    assert_eq!(store.raw("ubuntuTokens").as_deref(), Some("3"));
    assert_eq!(store.raw("selfLedStreak").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_flush_reports_remaining_failures() {
    let (store, manager) = fresh().await;
    store.set_fail_writes(true);
    manager.award_token(1, "test").await.unwrap();
    assert_eq!(manager.flush().await, 1);

    store.set_fail_writes(false);
    assert_eq!(manager.flush().await, 0);
    assert_eq!(store.raw("ubuntuTokens").as_deref(), Some("1"));
}

#[tokio::test]
async fn test_archetype_change_reorders_parts_and_persists() {
    let (store, manager) = fresh().await;
    manager.set_archetype(Archetype::Seeker).await;

    assert_eq!(store.raw("archetype").as_deref(), Some("Seeker"));
    let parts = manager.part_ordering().await;
    assert_eq!(&parts[..3], &[Part::Explorer, Part::Rebel, Part::WoundedChild]);
    assert_eq!(parts.len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_are_serialized() {
    let (_store, manager) = fresh().await;
    let day = ts("2025-03-10T08:00:00Z");

    let mut tasks = Vec::new();
    for i in 0..16 {
        let m = manager.clone();
        tasks.push(tokio::spawn(async move {
            if i % 4 == 0 {
                m.record_part_work(day).await;
            } else {
                m.record_mood(Emotion::Grounded, level(1), day).await;
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let snap = manager.snapshot().await;
    assert_eq!(snap.self_led_streak, 1);
    assert_eq!(snap.logged_moods, 12);
    // 12 mood awards, plus 2 only if part work closed the pair
    assert!(snap.ubuntu_tokens == 12 || snap.ubuntu_tokens == 14);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let path = std::env::temp_dir().join(format!("taru_state_{}.json", uuid::Uuid::new_v4()));
    let _ = std::fs::remove_file(&path);

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path.clone()));
        let manager = CheckInManager::init(store, &CheckInConfig::default()).await;
        manager.record_mood(Emotion::Peaceful, level(2), ts("2025-03-10T08:00:00Z")).await;
        manager.record_part_work(ts("2025-03-10T09:00:00Z")).await;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path.clone()));
    let manager = CheckInManager::init(store, &CheckInConfig::default()).await;
    let snap = manager.snapshot().await;
    assert_eq!(snap.self_led_streak, 1);
    assert_eq!(snap.ubuntu_tokens, 3);
    assert_eq!(snap.self_energy, 55);
    assert_eq!(manager.mood_logs().await[0].emotion, Emotion::Peaceful);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_corrupt_state_file_is_moved_aside_and_replaced() {
    let path = std::env::temp_dir().join(format!("taru_corrupt_{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, "{not json").unwrap();

    let file_store = Arc::new(FileStore::new(path.clone()));
    let aside = file_store.quarantine_path();
    let store: Arc<dyn KeyValueStore> = file_store;
    let manager = CheckInManager::init(store, &CheckInConfig::default()).await;

    let snap = manager.snapshot().await;
    assert_eq!(snap.self_energy, 50, "Unreadable file should load as defaults");

    manager.record_mood(Emotion::Calm, level(2), ts("2025-03-10T08:00:00Z")).await;
    assert_eq!(manager.flush().await, 0);

    let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["selfEnergy"], "55");
    assert_eq!(on_disk["ubuntuTokens"], "1");
    assert_eq!(std::fs::read_to_string(&aside).unwrap(), "{not json");

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&aside);
}

#[tokio::test]
async fn test_saturated_streak_does_not_overflow() {
    let store = Arc::new(MemoryStore::with_entries([("selfLedStreak", u32::MAX.to_string())]));
    let manager = CheckInManager::init(store.clone(), &CheckInConfig::default()).await;

    manager.record_part_work(ts("2025-03-10T07:00:00Z")).await;
    manager.record_mood(Emotion::Calm, level(2), ts("2025-03-10T08:00:00Z")).await;

    assert_eq!(manager.snapshot().await.self_led_streak, u32::MAX);
    assert_eq!(store.raw("selfLedStreak"), Some(u32::MAX.to_string()));
}
