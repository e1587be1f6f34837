use clap::{Parser, Subcommand};

mod commands;

use commands::{AnalyzeArgs, CheckConfigArgs, ReplayArgs};

#[derive(Parser)]
#[command(name = "flowstate")]
#[command(about = "Flow state monitor for borrow-constrained stocks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a market CSV and print the flow state summary
    Analyze(AnalyzeArgs),
    /// Print the full per-day signal trail for a market CSV
    Replay(ReplayArgs),
    /// Load and validate a configuration file
    CheckConfig(CheckConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let outcome = match cli.command {
        Commands::Analyze(args) => commands::run_analyze(&args),
        Commands::Replay(args) => commands::run_replay(&args),
        Commands::CheckConfig(args) => commands::run_check_config(&args),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(3);
        }
    }
}
