use super::{ProgressEvent, ProgressHandler};
use std::sync::Mutex;

/// Handler that keeps every event it receives, in arrival order
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn progress_values(&self) -> Vec<u8> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Progress(fraction) => Some(*fraction),
                ProgressEvent::Stage(_) => None,
            })
            .collect()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Stage(label) => Some(label.clone()),
                ProgressEvent::Progress(_) => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<u8> {
        self.progress_values().last().copied()
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, fraction: u8) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Progress(fraction));
    }

    fn on_stage(&self, label: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ProgressEvent::Stage(label.to_string()));
    }
}
