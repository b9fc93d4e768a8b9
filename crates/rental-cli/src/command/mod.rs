use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rental_analysis::filter::FilterSpec;
use rental_stats::bootstrap::{BootstrapConfig, DEFAULT_ALPHA, DEFAULT_RESAMPLE_COUNT};

use self::{query::QueryArg, report::ReportArg, summary::SummaryArg};

mod query;
mod report;
mod summary;
mod table;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Rank groups of listings by bootstrap mean price
    Report(#[clap(flatten)] ReportArg),
    /// Estimate the mean price of the listings matching a filter
    Query(#[clap(flatten)] QueryArg),
    /// Print descriptive statistics of the listing prices
    Summary(#[clap(flatten)] SummaryArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Query(arg) => query::run(&arg)?,
        Mode::Summary(arg) => summary::run(&arg)?,
    }
    Ok(())
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Dataset and filter arguments shared by all subcommands.
#[derive(Debug, Clone, Args)]
pub(crate) struct DatasetArg {
    /// Path to the listings JSON file
    pub dataset: PathBuf,

    /// Restrict listings, e.g. `--where bedrooms=2,3 --where superhost=t`
    #[arg(long = "where", value_name = "ATTR=V1,V2")]
    pub filters: Vec<String>,

    /// JSON file with a filter object, e.g. {"bedrooms": [2], "superhost": [true]}
    #[arg(long)]
    pub filter_file: Option<PathBuf>,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl DatasetArg {
    pub(crate) fn filter(&self) -> anyhow::Result<FilterSpec> {
        let mut filter = match &self.filter_file {
            Some(path) => crate::util::read_filter_file(path)?,
            None => FilterSpec::new(),
        };
        for expr in &self.filters {
            filter.add_expression(expr)?;
        }
        Ok(filter)
    }
}

/// Bootstrap and output options shared by `report` and `query`.
#[derive(Debug, Clone, Args)]
pub(crate) struct EstimateArg {
    /// Number of bootstrap resamples
    #[arg(long, default_value_t = DEFAULT_RESAMPLE_COUNT)]
    pub resamples: usize,

    /// Significance level of the two-sided (1 - alpha) interval
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Seed for reproducible resampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

impl EstimateArg {
    pub(crate) fn config(&self) -> anyhow::Result<BootstrapConfig> {
        let config = BootstrapConfig {
            resample_count: self.resamples,
            alpha: self.alpha,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}
