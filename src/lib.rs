pub mod cli;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod histogram;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use colored::Colorize;
use std::io::{self, Write};

use crate::cli::{AnalyzeArgs, Command, DatasetArgs};
use crate::config::settings::AppConfig;
use crate::dataset::{CsvRatingSource, RatingSource};
use crate::domain::AnalysisReport;
use crate::histogram::TerminalRenderer;
use crate::services::AnalysisService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    args.apply(&mut config);

    let source = CsvRatingSource::from_settings(&config.analysis);
    analyze_to(args, config, &source, &mut io::stdout(), &mut io::stderr())
}

/// Runs the analysis and writes the report to `out`.
///
/// With `--json` the histogram goes to `diagnostics` so `out` stays parseable.
pub fn analyze_to<W: Write, E: Write>(
    args: &AnalyzeArgs,
    config: AppConfig,
    source: &dyn RatingSource,
    out: &mut W,
    diagnostics: &mut E,
) -> Result<()> {
    let bar_width = config.histogram.bar_width;
    let service = AnalysisService::new(config);

    let report = if args.json {
        let mut renderer = TerminalRenderer::new(&mut *diagnostics, bar_width);
        service.run(source, &mut renderer)?
    } else {
        let mut renderer = TerminalRenderer::new(&mut *out, bar_width);
        service.run(source, &mut renderer)?
    };

    write_report(&report, args.json, out)
}

fn write_report<W: Write>(report: &AnalysisReport, json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        writeln!(out, "{}", "Rating analysis".bold())?;
        writeln!(out, "{}", report)?;
    }
    out.flush()?;
    Ok(())
}

pub fn handle_histogram(args: &DatasetArgs) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    args.apply(&mut config);

    let source = CsvRatingSource::from_settings(&config.analysis);
    let mut renderer = TerminalRenderer::stdout(config.histogram.bar_width);
    AnalysisService::new(config).run_histogram(&source, &mut renderer)
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const RATINGS: &str = "Invoice ID,Rating\n1,9.1\n2,9.6\n3,7.4\n4,8.4\n5,5.3\n6,4.1\n";

    fn write_dataset(path: &Path) -> CsvRatingSource {
        fs::write(path, RATINGS).unwrap();
        CsvRatingSource::new(path, "Rating", ',')
    }

    #[test]
    fn test_json_output_is_parseable() {
        let path = std::env::temp_dir().join("supermarket_ratings_json_test.csv");
        let source = write_dataset(&path);
        let args = AnalyzeArgs {
            json: true,
            ..AnalyzeArgs::default()
        };

        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        analyze_to(&args, AppConfig::new(), &source, &mut out, &mut diagnostics).unwrap();

        let stdout = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(json["row_count"], 6);

        let stderr = String::from_utf8(diagnostics).unwrap();
        assert!(stderr.contains("Rating distribution"));

        // Cleanup
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_text_output_holds_histogram_and_summary() {
        let path = std::env::temp_dir().join("supermarket_ratings_text_test.csv");
        let source = write_dataset(&path);

        let mut out = Vec::new();
        let mut diagnostics = Vec::new();
        analyze_to(
            &AnalyzeArgs::default(),
            AppConfig::new(),
            &source,
            &mut out,
            &mut diagnostics,
        )
        .unwrap();

        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.contains("Rating distribution"));
        assert!(stdout.contains("Beta parameters:"));
        assert!(diagnostics.is_empty());

        // Cleanup
        fs::remove_file(&path).unwrap();
    }
}
