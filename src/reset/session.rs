use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::routines::ResetRoutine;
use super::timer::{ResetTimer, TimerSnapshot, TimerState};

/// Drives a `ResetTimer` in real time. While running, one background task
/// feeds it both the one-second countdown and the step interval; pausing,
/// resetting, completing or dropping the session stops that task.
pub struct ResetSession {
    routine: &'static ResetRoutine,
    timer: Arc<Mutex<ResetTimer>>,
    ticker: Option<Ticker>,
}

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn stop(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

impl ResetSession {
    pub fn new(routine: &'static ResetRoutine) -> Self {
        Self {
            routine,
            timer: Arc::new(Mutex::new(ResetTimer::for_routine(routine))),
            ticker: None,
        }
    }

    pub fn routine(&self) -> &'static ResetRoutine {
        self.routine
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop_ticker();
        let state = {
            let mut timer = lock(&self.timer);
            timer.start();
            timer.state()
        };
        if state != TimerState::Running {
            return;
        }

        let cancel = CancellationToken::new();
        let step_every = Duration::from_secs(self.routine.step_interval_secs.max(1) as u64);
        let handle = tokio::spawn(run_ticker(self.timer.clone(), cancel.clone(), step_every));
        self.ticker = Some(Ticker { cancel, handle });
    }

    pub fn pause(&mut self) {
        self.stop_ticker();
        lock(&self.timer).pause();
    }

    pub fn reset(&mut self) {
        self.stop_ticker();
        lock(&self.timer).reset();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        lock(&self.timer).snapshot()
    }

    pub fn current_instruction(&self) -> &'static str {
        let index = lock(&self.timer).step_index();
        self.routine.steps.get(index).copied().unwrap_or("")
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
    }
}

impl Drop for ResetSession {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

fn lock(timer: &Mutex<ResetTimer>) -> MutexGuard<'_, ResetTimer> {
    timer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_ticker(
    timer: Arc<Mutex<ResetTimer>>,
    cancel: CancellationToken,
    step_every: Duration,
) {
    let start = Instant::now();
    let second = Duration::from_secs(1);
    let mut countdown = interval_at(start + second, second);
    let mut steps = interval_at(start + step_every, step_every);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Burst);
    steps.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = countdown.tick() => {
                if lock(&timer).tick_second() != TimerState::Running {
                    break;
                }
            }
            _ = steps.tick() => {
                lock(&timer).advance_step();
            }
        }
    }
}
