//! Structured logging setup for foodlens
//!
//! Initializes the `tracing` subscriber. Console output is the default; JSON
//! lines can be enabled for production. `RUST_LOG` always takes precedence
//! over the configured level.
//!
//! # Example
//!
//! ```no_run
//! use foodlens::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(url = "https://example.com/p1", "Analyzing product");
//! ```

use crate::config::FoodlensConfig;
use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Noisy HTTP stack targets kept at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: [&str; 3] = ["h2", "hyper", "reqwest"];

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level for foodlens targets
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., foodlens::pipeline) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Write to stderr instead of stdout, keeping stdout for reports
    pub to_stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            to_stderr: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON output with source locations
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            to_stderr: true,
        }
    }

    pub fn from_config(config: &FoodlensConfig) -> Self {
        Self {
            level: parse_level(&config.log_level),
            use_json: config.log_json,
            ..Default::default()
        }
    }
}

/// Parses a log level, case-insensitively, defaulting to INFO
///
/// ```
/// use foodlens::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let mut filter = EnvFilter::new(format!("foodlens={}", level));
    for target in QUIET_TARGETS {
        if let Ok(directive) = format!("{}=warn", target).parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Initializes the logging system; only the first call has any effect
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            let layer = fmt::layer()
                .json()
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            if config.to_stderr {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.with_writer(std::io::stderr))
                    .init();
            } else {
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
        } else {
            let layer = fmt::layer()
                .with_target(config.include_target)
                .with_file(config.include_location)
                .with_line_number(config.include_location);
            if config.to_stderr {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.with_writer(std::io::stderr))
                    .init();
            } else {
                tracing_subscriber::registry().with(filter).with(layer).init();
            }
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `FOODLENS_LOG_LEVEL` and `FOODLENS_LOG_JSON`
pub fn init_from_env() {
    init_logging(LoggingConfig::from_config(&FoodlensConfig::default()));
}
