pub mod commands;
pub mod output;
pub mod progress_bar;

pub use commands::{AnalyzeArgs, CliArgs, Commands, OutputFormatArg, StepsArgs};
pub use output::{OutputFormat, OutputFormatter, ReportEnvelope};
pub use progress_bar::ProgressBarHandler;
