//! Per-run execution context
//!
//! A [`PipelineRun`] owns the observable state of one analysis: its progress
//! fraction, the current stage label and the state machine position. Only the
//! pipeline mutates it; progress handlers see every change as it happens.

use crate::progress::{NoOpHandler, ProgressHandler};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Highest progress value reported before a run has succeeded
const MAX_IN_FLIGHT_PROGRESS: u8 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Extracting,
    Analyzing,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Extracting => "extracting",
            RunState::Analyzing => "analyzing",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

pub struct PipelineRun {
    id: Uuid,
    step_count: usize,
    progress: AtomicU8,
    stage: Mutex<String>,
    state: Mutex<RunState>,
    handler: Arc<dyn ProgressHandler>,
}

impl PipelineRun {
    /// Creates an idle run for a pipeline with `step_count` analysis steps
    pub fn new(step_count: usize, handler: Arc<dyn ProgressHandler>) -> Self {
        Self {
            id: Uuid::new_v4(),
            step_count,
            progress: AtomicU8::new(0),
            stage: Mutex::new(String::new()),
            state: Mutex::new(RunState::Idle),
            handler,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    pub fn stage(&self) -> String {
        self.stage.lock().unwrap().clone()
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    /// Progress credited for each settled step, the prerequisite included
    pub fn tick(&self) -> u8 {
        (100 / (self.step_count + 1)) as u8
    }

    /// Claims an idle run, moving it to `Extracting`
    ///
    /// The check and the transition happen under one lock, so of several
    /// callers racing on the same run exactly one succeeds. The others get
    /// the state they found.
    pub(crate) fn begin(&self) -> Result<(), RunState> {
        let mut state = self.state.lock().unwrap();
        if *state != RunState::Idle {
            return Err(*state);
        }
        debug!(run_id = %self.id, from = %RunState::Idle, to = %RunState::Extracting, "Run state transition");
        *state = RunState::Extracting;
        Ok(())
    }

    /// Resets progress to zero and reports the first stage
    pub(crate) fn start(&self, stage: &str) {
        self.progress.store(0, Ordering::SeqCst);
        self.handler.on_progress(0);
        self.set_stage(stage);
    }

    /// Overwrites the stage label; concurrent steps race and the last write wins
    pub(crate) fn set_stage(&self, label: &str) {
        *self.stage.lock().unwrap() = label.to_string();
        self.handler.on_stage(label);
    }

    pub(crate) fn transition(&self, next: RunState) {
        let mut state = self.state.lock().unwrap();
        let previous = *state;
        debug!(run_id = %self.id, from = %previous, to = %next, "Run state transition");
        *state = next;
    }

    /// Credits one settled step and reports the new progress value
    ///
    /// Progress stays below 100 until [`complete`](Self::complete) is called.
    pub(crate) fn advance(&self) -> u8 {
        let tick = self.tick();
        let previous = self
            .progress
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(tick).min(MAX_IN_FLIGHT_PROGRESS))
            })
            .unwrap_or_else(|current| current);
        let current = previous.saturating_add(tick).min(MAX_IN_FLIGHT_PROGRESS);
        self.handler.on_progress(current);
        current
    }

    pub(crate) fn complete(&self) {
        self.progress.store(100, Ordering::SeqCst);
        self.transition(RunState::Completed);
        self.handler.on_progress(100);
    }

    pub(crate) fn fail(&self) {
        self.transition(RunState::Failed);
    }
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self::new(0, Arc::new(NoOpHandler))
    }
}

impl fmt::Debug for PipelineRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRun")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("progress", &self.progress())
            .field("stage", &self.stage())
            .finish()
    }
}
