use foodlens::cli::commands::{AnalyzeArgs, CliArgs, Commands, StepsArgs};
use foodlens::cli::output::{OutputFormat, OutputFormatter, ReportEnvelope};
use foodlens::cli::ProgressBarHandler;
use foodlens::util::logging::{init_logging, parse_level, LoggingConfig};
use foodlens::{
    AnalysisPipeline, FoodlensConfig, LoggingHandler, PipelineError, ProgressHandler, VERSION,
};

use anyhow::Context;
use clap::Parser;
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("foodlens v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, args.quiet).await,
        Commands::Steps(steps_args) => handle_steps(steps_args, args.verbose),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let config = FoodlensConfig::default();

    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig {
        level,
        use_json: config.log_json,
        ..Default::default()
    });
}

async fn handle_analyze(args: &AnalyzeArgs, quiet: bool) -> i32 {
    info!("Starting product analysis");

    let default_config = FoodlensConfig::default();
    let config = FoodlensConfig {
        api_url: args
            .api_url
            .clone()
            .unwrap_or_else(|| default_config.api_url.clone()),
        ..default_config
    };
    if args.api_url.is_some() {
        debug!("API URL overridden to: {}", config.api_url);
    }

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check FOODLENS_* environment variables and command-line arguments.");
        return 1;
    }

    let format: OutputFormat = args.format.into();
    let progress_bar =
        (!quiet && format == OutputFormat::Human).then(|| Arc::new(ProgressBarHandler::new()));
    let progress: Arc<dyn ProgressHandler> = match &progress_bar {
        Some(bar) => bar.clone() as Arc<dyn ProgressHandler>,
        None => Arc::new(LoggingHandler),
    };

    let pipeline = AnalysisPipeline::new(config.create_client()).with_progress(progress);

    info!("Analyzing product: {}", args.url);

    let result = pipeline.run(&args.url).await;
    if let Some(bar) = &progress_bar {
        bar.finish();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return match e {
                PipelineError::InvalidInput(_) => 2,
                PipelineError::Extraction(_) => {
                    eprintln!(
                        "\nCould not read the product page. Check the URL and that the analysis service at {} is running.",
                        config.api_url
                    );
                    1
                }
                PipelineError::AllStepsFailed { failures } => {
                    for (key, failure) in &failures {
                        debug!(step = %key, error = %failure, "Step failure");
                    }
                    1
                }
            };
        }
    };

    info!(
        "Analysis complete: {} of {} steps succeeded",
        report.len(),
        pipeline.steps().len()
    );

    let envelope = ReportEnvelope {
        url: &args.url,
        analyzed_at: chrono::Utc::now(),
        report: &report,
    };
    let output = match OutputFormatter::new(format).format_envelope(&envelope) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            return 1;
        }
    };

    if let Some(output_file) = &args.output {
        let written = std::fs::write(output_file, &output)
            .with_context(|| format!("Failed to write output to {}", output_file.display()));
        match written {
            Ok(_) => {
                info!("Output written to: {}", output_file.display());
                if !quiet {
                    println!("Output written to: {}", output_file.display());
                }
            }
            Err(e) => {
                error!("{:#}", e);
                return 1;
            }
        }
    } else {
        println!("{}", output);
    }

    0
}

fn handle_steps(args: &StepsArgs, verbose: bool) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());

    match formatter.format_steps(&foodlens::STEP_CATALOG, verbose) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format steps: {:#}", e);
            1
        }
    }
}
