//! Progress reporting for pipeline runs

mod handler;
mod logging;
mod recording;

pub use handler::{NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
pub use recording::RecordingHandler;
