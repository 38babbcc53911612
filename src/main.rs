use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use mission_runner::api::ApiServer;
use mission_runner::report::{self, ReportFormat};
use mission_runner::utils::config::{Config, ServerConfig};
use mission_runner::utils::logging;
use mission_runner::{runner, MissionService, Mode};

#[derive(Parser)]
#[command(name = "mission-runner")]
#[command(version)]
#[command(about = "Runs acceptance-test missions and reports their results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the mission API server
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },

    /// Verify a mission once and print its report
    Verify {
        /// Mission to verify
        mission_id: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        config: Config,
    },

    /// List a mission's requirements without running them
    Requirements {
        /// Mission to list
        mission_id: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        config: Config,
    },

    /// Build a report from lifecycle events on stdin and print it on stdout
    Report,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ReportFormat,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            ApiServer::new(config).start().await?;
        }

        Commands::Verify {
            mission_id,
            output,
            config,
        } => run_once(Mode::Verify, &mission_id, &output, &config).await?,

        Commands::Requirements {
            mission_id,
            output,
            config,
        } => run_once(Mode::Requirements, &mission_id, &output, &config).await?,

        Commands::Report => {
            let stdin = std::io::stdin().lock();
            let stdout = std::io::stdout().lock();
            runner::report_events(stdin, stdout)?;
        }
    }

    Ok(())
}

async fn run_once(
    mode: Mode,
    mission_id: &str,
    output: &OutputArgs,
    config: &Config,
) -> anyhow::Result<()> {
    eprintln!(
        "{} {} mission: {}",
        "▶".green().bold(),
        match mode {
            Mode::Verify => "Verifying",
            Mode::Requirements => "Listing",
        },
        mission_id.cyan()
    );

    let service = MissionService::from_config(config)?;
    let result = service.run(mode, mission_id).await?;

    let summary = result.summary();
    match mode {
        Mode::Verify => eprintln!(
            "  {} tests: {} passed, {} failed",
            summary.total_tests,
            summary.passed.to_string().green(),
            summary.failed.to_string().red()
        ),
        Mode::Requirements => eprintln!("  {} requirements", summary.total_tests),
    }

    report::write_report(&result, output.format, output.output.as_deref())?;

    Ok(())
}
