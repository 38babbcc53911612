pub mod events;
pub mod reporter;
pub mod state;

use anyhow::Result;
use std::io::{BufRead, Write};

pub use events::*;
pub use reporter::StepReporter;
pub use state::*;

use crate::report::types::TestRunReport;

/// Drive a reporter from newline-delimited lifecycle events.
///
/// Lines that are not events are skipped with a warning. Reading stops once
/// the run has ended; the report is written to `output` at that point.
pub fn report_events<R: BufRead, W: Write>(input: R, output: W) -> Result<TestRunReport> {
    let mut reporter = StepReporter::new(output);

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let event: LifecycleEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Skipping line {}: not a lifecycle event ({})", number + 1, e);
                continue;
            }
        };

        reporter.handle(&event)?;

        if reporter.phase() == RunPhase::Finalized {
            break;
        }
    }

    reporter
        .into_report()
        .ok_or_else(|| anyhow::anyhow!("Input ended before the run finished"))
}
