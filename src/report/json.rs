use super::types::TestRunReport;
use anyhow::Result;

/// Render a report as pretty-printed JSON
pub fn generate_json(report: &TestRunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
