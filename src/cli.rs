use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::settings::AppConfig;
use crate::rating::SpreadMode;

#[derive(Parser, Debug)]
#[command(author, version, about = "supermarket rating statistics")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Fit a Beta distribution to the ratings and report the tail probability
    Analyze(AnalyzeArgs),
    /// Only draw the rating histogram
    Histogram(DatasetArgs),
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct DatasetArgs {
    /// Delimited ratings file (defaults to $RATINGS_DATASET or SuperMarketData.csv)
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,
    /// Name of the rating column
    #[arg(short, long)]
    pub column: Option<String>,
    /// Number of histogram bins
    #[arg(short, long)]
    pub bins: Option<usize>,
}

impl DatasetArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.dataset {
            config.analysis.dataset_path = path.clone();
        }
        if let Some(column) = &self.column {
            config.analysis.rating_column = column.clone();
        }
        if let Some(bins) = self.bins {
            config.histogram.bins = bins;
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Rating cutoff for the tail probability (defaults to 8.5)
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f64>,
    /// Spread used by the Normal approximation
    #[arg(long, value_enum)]
    pub spread: Option<SpreadMode>,
    /// Skip drawing the histogram
    #[arg(long)]
    pub no_histogram: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        self.dataset.apply(config);

        if let Some(threshold) = self.threshold {
            config.analysis.threshold = threshold;
        }
        if let Some(spread) = self.spread {
            config.analysis.spread = spread;
        }
        if self.no_histogram {
            config.histogram.enabled = false;
        }
    }
}
