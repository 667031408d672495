use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Food product analysis from a product page URL
#[derive(Parser, Debug)]
#[command(
    name = "foodlens",
    about = "Food product analysis from a product page URL",
    version,
    author,
    long_about = "foodlens sends a product page to an analysis service, runs food preference, \
                  health grade, risk, allergen and nutrition analyses concurrently, and prints \
                  whatever succeeded as one report."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Analyze a product page",
        long_about = "Extracts the product page through the analysis service and runs every \
                      catalog analysis against it. Steps that fail are left out of the report; \
                      the command fails only if extraction fails or every step fails.\n\n\
                      Examples:\n  \
                      foodlens analyze https://example.com/p1\n  \
                      foodlens analyze https://example.com/p1 --format json\n  \
                      foodlens analyze https://example.com/p1 --api-url http://analysis:8000"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "List the analysis steps",
        long_about = "Lists every analysis step with its stage label. With --verbose the full \
                      query sent to the analysis service is shown as well.\n\n\
                      Examples:\n  \
                      foodlens steps\n  \
                      foodlens -v steps\n  \
                      foodlens steps --format json"
    )]
    Steps(StepsArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "URL", help = "Product page URL")]
    pub url: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        long,
        value_name = "URL",
        help = "Analysis service base URL (overrides FOODLENS_API_URL)"
    )]
    pub api_url: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct StepsArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
