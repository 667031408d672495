//! Logging-based progress handler

use super::ProgressHandler;
use tracing::{debug, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, fraction: u8) {
        if fraction >= 100 {
            info!(progress = fraction, "Analysis complete");
        } else {
            debug!(progress = fraction, "Analysis progress");
        }
    }

    fn on_stage(&self, label: &str) {
        info!(stage = %label, "Stage started");
    }
}
