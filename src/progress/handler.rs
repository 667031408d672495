//! Progress handler trait and events

/// Observable progress update emitted by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Overall completion, 0 to 100
    Progress(u8),
    /// Human-readable label of the stage currently running
    Stage(String),
}

/// Receiver of progress updates during a pipeline run
///
/// Only the pipeline writes to a handler. Handlers have no failure modes of
/// their own.
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, fraction: u8);

    fn on_stage(&self, label: &str);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _fraction: u8) {}

    fn on_stage(&self, _label: &str) {}
}
