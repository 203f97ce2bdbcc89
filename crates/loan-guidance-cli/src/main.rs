mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{AnalyzeArgs, RecommendationsArgs, ScheduleArgs};

/// Loan affordability analysis from the command line
#[derive(Parser)]
#[command(
    name = "loan-guidance",
    version,
    about = "Loan affordability analysis with decimal precision",
    long_about = "A CLI for analyzing single-loan scenarios: amortization \
                  schedules, debt-to-income and coverage ratios, risk \
                  classification, and rule-based recommendations."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full loan analysis (metrics, risk, narrative, schedule summary)
    Analyze(AnalyzeArgs),
    /// Generate the full amortization schedule
    Schedule(ScheduleArgs),
    /// Derive the rule-based recommendation list
    Recommendations(RecommendationsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::loan::run_analyze(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Recommendations(args) => commands::loan::run_recommendations(args),
        Commands::Version => {
            println!("loan-guidance {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
