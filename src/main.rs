use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use taru::checkin::{CheckInManager, FileStore, KeyValueStore};
use taru::config::CheckInConfig;
use taru::intervention::{for_archetype, practice_for};
use taru::mood::{Emotion, Intensity};
use taru::onboarding::score_choices;
use taru::reset::{routine, routine_for, ResetSession, TimerState};
use taru::services::sync::{HttpSyncClient, SyncQueue};

const USAGE: &str = "usage: taru <mood EMOTION INTENSITY [NOTE..] | part | quiz CHOICE.. | interventions | logs | status | reset KEY>";

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = CheckInConfig::from_env();
    let state_path =
        std::env::var("TARU_STATE_PATH").unwrap_or_else(|_| "taru_state.json".to_string());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(state_path));

    let mut sync_worker = None;
    let manager = match &config.sync {
        Some(sync) => {
            let remote = Arc::new(HttpSyncClient::from_config(sync));
            let (queue, worker) = SyncQueue::spawn(remote, sync.queue_capacity, sync.timeout());
            sync_worker = Some(worker);
            CheckInManager::init_with_sync(store, &config, queue, sync.user_id.clone()).await
        }
        None => CheckInManager::init(store, &config).await,
    };
    let day = manager.local_day();

    match command.as_str() {
        "mood" => {
            let emotion: Emotion = args.get(1).ok_or_else(|| anyhow!(USAGE))?.parse()?;
            let raw: u8 = args
                .get(2)
                .ok_or_else(|| anyhow!(USAGE))?
                .parse()
                .context("intensity must be a number from 1 to 5")?;
            let intensity = Intensity::new(raw)?;
            let note = (args.len() > 3).then(|| args[3..].join(" "));

            let suggestions = manager
                .record_mood_with_note(emotion, intensity, day.now(), note)
                .await;
            for (rank, s) in suggestions.iter().enumerate() {
                let kind = format!("{:?}", s.kind);
                println!("{}. {:<20} {:>5.1}  {}", rank + 1, kind, s.priority, s.reason);
            }
            if let Some(top) = suggestions.first() {
                if let Some(r) = routine_for(top.kind, intensity) {
                    println!("Try: taru reset {}  ({})", r.key, r.title);
                } else if let Some(p) = practice_for(top.kind, manager.archetype().await) {
                    println!("\n{}\n{}\n\n{}", p.title, p.description, p.prompt);
                }
            }
        }
        "part" => {
            manager.record_part_work(day.now()).await;
            println!("Part work recorded.");
        }
        "quiz" => {
            let choices = args[1..]
                .iter()
                .map(|c| c.parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .context("quiz choices are option indices")?;
            let outcome = score_choices(&choices);
            manager.set_archetype(outcome.archetype).await;
            let profile = outcome.archetype.profile();
            println!("{} - {}", profile.title, profile.tagline);
            let parts: Vec<&str> =
                manager.part_ordering().await.iter().map(|p| p.label()).collect();
            println!("Parts: {}", parts.join(", "));
        }
        "interventions" => {
            let archetype = manager.archetype().await;
            println!("{} Interventions", archetype);
            for p in for_archetype(archetype) {
                println!("- {:<16} {}  ({})", p.id, p.title, p.description);
            }
        }
        "logs" => {
            for entry in manager.mood_logs().await {
                println!(
                    "{}  {:<13} {}  {}",
                    entry.timestamp.to_rfc3339(),
                    entry.emotion,
                    entry.intensity.value(),
                    entry.note.as_deref().unwrap_or("")
                );
            }
        }
        "status" => {
            println!("{}", serde_json::to_string_pretty(&manager.snapshot().await)?);
        }
        "reset" => {
            let key = args.get(1).map(String::as_str).unwrap_or("sigh");
            let r = routine(key).ok_or_else(|| anyhow!("unknown reset: {}", key))?;
            let mut session = ResetSession::new(r);
            println!("{}: {}", r.title, r.description);
            session.start();
            let mut last_step = usize::MAX;
            loop {
                tokio::time::sleep(Duration::from_millis(250)).await;
                let snap = session.snapshot();
                if snap.step_index != last_step {
                    last_step = snap.step_index;
                    println!("[{:>3}s] {}", snap.remaining_secs, session.current_instruction());
                }
                if snap.state == TimerState::Completed {
                    println!("Done. Cycles completed: {}", snap.cycles);
                    break;
                }
            }
        }
        other => return Err(anyhow!("unknown command {:?}\n{}", other, USAGE)),
    }

    let pending = manager.flush().await;
    if pending > 0 {
        tracing::warn!("{} state key(s) could not be saved", pending);
    }

    // Closing the last queue handle lets the worker drain and exit.
    drop(manager);
    if let Some(worker) = sync_worker {
        match tokio::time::timeout(Duration::from_secs(10), worker).await {
            Ok(Ok(stats)) => {
                tracing::info!(accepted = stats.accepted, failed = stats.failed, "Sync drained")
            }
            Ok(Err(e)) => tracing::warn!("Sync worker crashed: {}", e),
            Err(_) => tracing::warn!("Sync worker did not drain in time"),
        }
    }

    Ok(())
}
