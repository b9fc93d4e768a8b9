use anyhow::Context;
use clap::Args;
use rental_analysis::query;

use super::{DatasetArg, EstimateArg, OutputFormat, table};
use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct QueryArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    #[clap(flatten)]
    pub estimate: EstimateArg,
}

#[derive(Debug, serde::Serialize)]
struct QueryOutput<'a> {
    filter: &'a rental_analysis::filter::FilterSpec,
    config: &'a rental_stats::bootstrap::BootstrapConfig,
    result: &'a rental_stats::bootstrap::BootstrapResult,
}

pub(crate) fn run(arg: &QueryArg) -> anyhow::Result<()> {
    let QueryArg { dataset, estimate } = arg;
    let config = estimate.config()?;
    let filter = dataset.filter()?;
    let collection = util::read_dataset_file(&dataset.dataset)?;

    let result = query::query(&collection.listings, &filter, &config)?;
    if let Some(warning) = &result.warning {
        tracing::warn!("{warning}");
    }

    let mut output = Output::from_output_path(dataset.output.clone())?;
    match estimate.format {
        OutputFormat::Text => {
            let text = table::render_result(&filter.to_string(), &result, &config)
                .context("Failed to render result table")?;
            output.write_text(&text)?;
        }
        OutputFormat::Json => output.write_json(&QueryOutput {
            filter: &filter,
            config: &config,
            result: &result,
        })?,
    }
    Ok(())
}
