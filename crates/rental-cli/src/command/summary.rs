use std::fmt::Write as _;

use anyhow::{Context, bail};
use clap::Args;
use rental_stats::{descriptive::DescriptiveStats, quantile::Quantiles};

use super::{DatasetArg, OutputFormat};
use crate::util::{self, Output};

const QUANTILE_POINTS: [f64; 5] = [0.05, 0.25, 0.5, 0.75, 0.95];

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, serde::Serialize)]
struct PriceSummary {
    filter: String,
    stats: DescriptiveStats,
    quantiles: Quantiles,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let SummaryArg { dataset, format } = arg;
    let filter = dataset.filter()?;
    let collection = util::read_dataset_file(&dataset.dataset)?;

    let mut prices = filter.prices(&collection.listings);
    prices.sort_by(f64::total_cmp);
    let Some(stats) = DescriptiveStats::from_sorted(&prices) else {
        bail!("No listings match {filter}");
    };
    let summary = PriceSummary {
        filter: filter.to_string(),
        quantiles: Quantiles::from_sorted(&prices, &QUANTILE_POINTS),
        stats,
    };

    let mut output = Output::from_output_path(dataset.output.clone())?;
    match format {
        OutputFormat::Text => {
            let text = render(&summary).context("Failed to render summary")?;
            output.write_text(&text)?;
        }
        OutputFormat::Json => output.write_json(&summary)?,
    }
    Ok(())
}

fn render(summary: &PriceSummary) -> Result<String, std::fmt::Error> {
    let PriceSummary {
        filter,
        stats,
        quantiles,
    } = summary;
    let mut out = String::new();
    writeln!(out, "Price summary ({filter})")?;
    writeln!(out, "  Count:    {}", stats.count)?;
    writeln!(out, "  Mean:     {:.2}", stats.mean)?;
    writeln!(out, "  Std dev:  {:.2}", stats.std_dev)?;
    writeln!(out, "  Min:      {:.2}", stats.min)?;
    writeln!(out, "  Median:   {:.2}", stats.median)?;
    writeln!(out, "  Max:      {:.2}", stats.max)?;
    for (p, value) in quantiles.iter() {
        writeln!(out, "  P{:<7} {value:.2}", format!("{}:", p * 100.0))?;
    }
    Ok(out)
}
