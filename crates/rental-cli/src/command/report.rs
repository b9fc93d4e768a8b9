use anyhow::Context;
use clap::Args;
use rental_analysis::{
    attribute::{Attribute, AttributeValue},
    report::GroupedReport,
};

use super::{DatasetArg, EstimateArg, OutputFormat, table};
use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    #[clap(flatten)]
    pub estimate: EstimateArg,

    /// Attribute to group listings by
    /// (neighbourhood, bedrooms, beds, property_type, room_type, superhost)
    #[arg(long)]
    pub by: Attribute,

    /// Only report these groups (comma-separated); groups without data are listed as excluded
    #[arg(long, value_delimiter = ',')]
    pub groups: Vec<String>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let ReportArg {
        dataset,
        estimate,
        by,
        groups,
    } = arg;
    let config = estimate.config()?;
    let filter = dataset.filter()?;
    let collection = util::read_dataset_file(&dataset.dataset)?;

    tracing::info!(
        "Building report by {by} over {filter} with {} resamples",
        config.resample_count
    );
    let report = if groups.is_empty() {
        GroupedReport::build_filtered(&collection.listings, *by, &filter, &config)?
    } else {
        let values = groups
            .iter()
            .map(|token| by.parse_value(token))
            .collect::<Result<Vec<AttributeValue>, _>>()?;
        GroupedReport::build_for_values(&collection.listings, *by, values, &filter, &config)?
    };
    tracing::info!(
        "Estimated {} groups, excluded {}",
        report.entries.len(),
        report.excluded.len()
    );

    let mut output = Output::from_output_path(dataset.output.clone())?;
    match estimate.format {
        OutputFormat::Text => {
            let text = table::render_report(&report).context("Failed to render report table")?;
            output.write_text(&text)?;
        }
        OutputFormat::Json => output.write_json(&report)?,
    }
    Ok(())
}
