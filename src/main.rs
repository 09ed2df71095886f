mod broadcast;
mod catalog;
mod demo;
mod fetch;
mod geometry;
mod proximity;
mod scheduler;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::web::Config;

#[derive(Parser)]
#[command(name = "sat-traffic")]
#[command(about = "Satellite traffic aggregation and proximity alerting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the aggregation service
    Serve {
        /// YAML config file; defaults apply when omitted
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()).await,
    }
}

async fn serve(config_path: Option<&str>) -> ExitCode {
    let config = match config_path {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
