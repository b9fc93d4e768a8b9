//! Fixed-width text rendering of bootstrap results

use std::fmt::{self, Write as _};

use rental_analysis::report::GroupedReport;
use rental_stats::bootstrap::{BootstrapConfig, BootstrapResult};

const SMALL_SAMPLE_MARK: &str = "*";

fn confidence_percent(config: &BootstrapConfig) -> f64 {
    (1.0 - config.alpha) * 100.0
}

fn write_header(out: &mut String, label_col: &str, config: &BootstrapConfig) -> fmt::Result {
    let ci = format!("{}% CI", confidence_percent(config));
    writeln!(
        out,
        "  {:>4} {:<28} {:>7} {:>10} {:>21}",
        "Rank", label_col, "N", "Estimate", ci
    )?;
    // rank(4) + label(28) + n(7) + estimate(10) + ci(21) + spaces(4)
    writeln!(out, "  {}", "-".repeat(74))
}

fn write_row(out: &mut String, rank: &str, label: &str, result: &BootstrapResult) -> fmt::Result {
    let mark = if result.is_small_sample() {
        SMALL_SAMPLE_MARK
    } else {
        ""
    };
    let interval = format!("[{:.2}, {:.2}]", result.lower_bound, result.upper_bound);
    writeln!(
        out,
        "  {:>4} {:<28} {:>7} {:>10.2} {:>21}{mark}",
        rank, label, result.sample_size, result.point_estimate, interval
    )
}

fn write_legend(out: &mut String, config: &BootstrapConfig) -> fmt::Result {
    writeln!(
        out,
        "  ({} resamples; {SMALL_SAMPLE_MARK} = small sample, interval is low-confidence)",
        config.resample_count
    )
}

pub(super) fn render_report(report: &GroupedReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Bootstrap mean price by {} ({})",
        report.attribute, report.filter
    )?;
    write_header(&mut out, report.attribute.name(), &report.config)?;
    for entry in &report.entries {
        write_row(
            &mut out,
            &entry.rank.to_string(),
            &entry.group.to_string(),
            &entry.result,
        )?;
    }
    write_legend(&mut out, &report.config)?;
    if !report.excluded.is_empty() {
        let excluded = report
            .excluded
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "  Excluded (no data): {excluded}")?;
    }
    Ok(out)
}

pub(super) fn render_result(
    label: &str,
    result: &BootstrapResult,
    config: &BootstrapConfig,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Bootstrap mean price")?;
    write_header(&mut out, "Filter", config)?;
    write_row(&mut out, "-", label, result)?;
    write_legend(&mut out, config)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_marks_small_samples() {
        let result = BootstrapResult {
            point_estimate: 30.0,
            lower_bound: 20.0,
            upper_bound: 40.0,
            sample_size: 3,
            warning: Some(rental_stats::bootstrap::SmallSampleWarning {
                sample_size: 3,
                threshold: 5,
            }),
        };
        let text = render_result("(all listings)", &result, &BootstrapConfig::default()).unwrap();
        assert!(text.contains("95% CI"));
        assert!(text.contains("[20.00, 40.00]*"));
        assert!(text.contains("1000 resamples"));
    }
}
