pub mod json;
pub mod junit;
pub mod types;

use anyhow::Result;
use clap::ValueEnum;
use std::path::Path;

use types::TestRunReport;

/// Output formats for a finished report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Junit,
}

pub fn render(report: &TestRunReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => json::generate_json(report),
        ReportFormat::Junit => junit::generate_junit_xml(report),
    }
}

/// Write a report to `output`, or to stdout when no path is given
pub fn write_report(
    report: &TestRunReport,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let rendered = render(report, format)?;

    if let Some(path) = output {
        std::fs::write(path, rendered)?;
        log::info!("Report saved to: {}", path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}
