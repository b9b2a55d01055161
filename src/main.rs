use anyhow::Result;

use supermarket_ratings::cli::Command;
use supermarket_ratings::{handle_analyze, handle_completions, handle_histogram, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Histogram(args) => handle_histogram(args),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
