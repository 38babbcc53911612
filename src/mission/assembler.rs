//! Turns captured engine stdout into a [`TestRunReport`].
//!
//! Two payloads are accepted: the finished report as one JSON document (the
//! engine ran its own reporter), or the raw lifecycle event stream as
//! newline-delimited JSON, which is replayed through a local reporter.

use crate::error::MalformedOutputError;
use crate::report::types::TestRunReport;
use crate::runner::events::LifecycleEvent;
use crate::runner::reporter::StepReporter;

pub fn assemble(stdout: &str) -> Result<TestRunReport, MalformedOutputError> {
    let output = stdout.trim();
    if output.is_empty() {
        return Err(MalformedOutputError::new("the test engine produced no output"));
    }

    if let Some(events) = parse_event_stream(output) {
        return replay(&events);
    }

    serde_json::from_str(output).map_err(|e| MalformedOutputError::new(e.to_string()))
}

/// `None` unless every non-empty line is a lifecycle event
fn parse_event_stream(output: &str) -> Option<Vec<LifecycleEvent>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).ok())
        .collect()
}

fn replay(events: &[LifecycleEvent]) -> Result<TestRunReport, MalformedOutputError> {
    let mut reporter = StepReporter::new(std::io::sink());

    for event in events {
        reporter
            .handle(event)
            .map_err(|e| MalformedOutputError::new(e.to_string()))?;
    }

    reporter
        .into_report()
        .ok_or_else(|| MalformedOutputError::new("the event stream ended before the run did"))
}
