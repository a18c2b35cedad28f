//! Teacher ratings CLI
//!
//! Prints faculty teachers with their VK poll and professorrating.org
//! ratings, or the list of departments.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ratings::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, ReportStage},
    utils::http::{HttpTransport, Transport},
};
use tokio::io::{AsyncBufReadExt, BufReader};

const GREETING: &str = r#"Hello! To get information about teachers type 1. To get information about departments print 2. Type 0 to exit.
Rating about teachers was fetched from:
    1) vk.com/pmprepod and represented in format "positive-negative-neutral | total"
    2) professorrating.org, represented as number <= 5
so, 1 or 2?"#;

/// Teacher ratings aggregator
#[derive(Parser, Debug)]
#[command(
    name = "ratings",
    version,
    about = "Teacher ratings from the VK poll board and professorrating.org"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print teachers with both ratings
    Teachers,

    /// Print the list of departments
    Departments,

    /// Interactive prompt (default)
    Interactive,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the HTTP transport shared by every source.
fn connect(config: &Config) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(HttpTransport::from_config(&config.transport)?))
}

fn validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");
    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("✓ Config OK");
    Ok(())
}

/// Print a report or the reason it could not be produced.
fn print_report(outcome: Result<String>, stage: impl FnOnce(&AppError) -> ReportStage) {
    match outcome {
        Ok(table) => print!("{table}"),
        Err(error) => {
            log::debug!("Report failed: {}", error);
            println!(
                "Was unable to get {}! Try to check connection and then repeat command",
                stage(&error).subject()
            );
        }
    }
}

async fn teachers(config: &Config, transport: &Arc<dyn Transport>) {
    let outcome = pipeline::run_teachers(config, Arc::clone(transport)).await;
    print_report(outcome, ReportStage::of_teachers_error);
}

async fn departments(config: &Config, transport: &Arc<dyn Transport>) {
    let outcome = pipeline::run_departments(config, Arc::clone(transport)).await;
    print_report(outcome, |_| ReportStage::DepartmentListing);
}

/// Read commands from stdin until `0` or end of input.
async fn interactive(config: &Config, transport: &Arc<dyn Transport>) -> Result<()> {
    println!("{GREETING}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "0" => break,
            "1" => teachers(config, transport).await,
            "2" => departments(config, transport).await,
            _ => {}
        }
    }
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Teachers => teachers(&config, &connect(&config)?).await,
        Command::Departments => departments(&config, &connect(&config)?).await,
        Command::Interactive => interactive(&config, &connect(&config)?).await?,
        Command::Validate => validate(&config)?,
    }

    Ok(())
}
