pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    about = "Product catalog operator CLI",
    long_about = "Inspect configuration, check catalog readiness, and query the catalog offline.",
    after_help = "Examples:\n  catalog doctor --json\n  catalog config\n  catalog get OLJCESPC7Z\n  catalog search typewriter"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and check that the catalog file loads")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List every product in catalog order")]
    List,
    #[command(about = "Fetch one product by its exact id")]
    Get {
        #[arg(help = "Product id (case-sensitive)")]
        id: String,
    },
    #[command(about = "Search product names and descriptions, ignoring case")]
    Search {
        #[arg(default_value = "", help = "Text to look for; empty matches everything")]
        query: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::List => commands::query::list(),
        Command::Get { id } => commands::query::get(&id),
        Command::Search { query } => commands::query::search(&query),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
