use serde::{Deserialize, Serialize};
use tracing::debug;

use super::routines::ResetRoutine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    Idle,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_secs: u32,
    pub step_index: usize,
    pub cycles: u32,
}

/// Deterministic countdown with an independent step cursor. Time is fed in
/// from outside via `tick_second` and `advance_step`.
#[derive(Debug, Clone)]
pub struct ResetTimer {
    duration_secs: u32,
    remaining_secs: u32,
    step_count: usize,
    step_index: usize,
    cycles: u32,
    state: TimerState,
}

impl ResetTimer {
    pub fn new(duration_secs: u32, step_count: usize) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            step_count: step_count.max(1),
            step_index: 0,
            cycles: 0,
            state: TimerState::Idle,
        }
    }

    pub fn for_routine(routine: &ResetRoutine) -> Self {
        Self::new(routine.duration_secs, routine.steps.len())
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs,
            step_index: self.step_index,
            cycles: self.cycles,
        }
    }

    /// Idle resumes where it paused; Completed starts a fresh run.
    pub fn start(&mut self) {
        match self.state {
            TimerState::Running => {}
            TimerState::Idle => self.state = TimerState::Running,
            TimerState::Completed => {
                self.rewind();
                self.state = TimerState::Running;
            }
        }
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
        }
        debug!(state = ?self.state, remaining = self.remaining_secs, "Reset timer started");
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Idle;
            debug!(remaining = self.remaining_secs, "Reset timer paused");
        }
    }

    pub fn reset(&mut self) {
        self.rewind();
        self.state = TimerState::Idle;
    }

    /// One second elapsed. Reaching zero completes the run.
    pub fn tick_second(&mut self) -> TimerState {
        if self.state != TimerState::Running {
            return self.state;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            debug!(cycles = self.cycles, "Reset timer completed");
        }
        self.state
    }

    /// One step interval elapsed. Wrapping to the first step counts a cycle.
    pub fn advance_step(&mut self) -> usize {
        if self.state != TimerState::Running {
            return self.step_index;
        }
        self.step_index = (self.step_index + 1) % self.step_count;
        if self.step_index == 0 {
            self.cycles += 1;
        }
        self.step_index
    }

    fn rewind(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.step_index = 0;
        self.cycles = 0;
    }
}
