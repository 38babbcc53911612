//! Step-aware reporter.
//!
//! A [`StepReporter`] is created per run and consumes that run's lifecycle
//! events in arrival order. Tests may interleave arbitrarily, so every event
//! is routed by test id. References to unknown tests or steps are ignored
//! rather than failing the run; the returned [`EventOutcome`] says which.
//!
//! When the run ends the finished [`TestRunReport`] is written to the
//! reporter's output as a single JSON document.

use chrono::Utc;
use std::io::Write;

use super::events::{LifecycleEvent, StepCategory, TestCase, TestError, TestStatus};
use super::state::{EventOutcome, IgnoreReason, RunPhase, TestState};
use crate::parser::error::parse_error;
use crate::report::types::{ParsedError, TestRunReport};

pub struct StepReporter<W: Write> {
    phase: RunPhase,
    tests: Vec<TestState>,
    report: Option<TestRunReport>,
    output: W,
}

impl<W: Write> StepReporter<W> {
    pub fn new(output: W) -> Self {
        Self {
            phase: RunPhase::Idle,
            tests: Vec::new(),
            report: None,
            output,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Dispatch one lifecycle event
    pub fn handle(&mut self, event: &LifecycleEvent) -> serde_json::Result<EventOutcome> {
        let outcome = match event {
            LifecycleEvent::RunBegin { tests } => self.on_run_begin(tests),
            LifecycleEvent::StepBegin {
                test_id,
                title,
                category,
            } => self.on_step_begin(test_id, title, *category),
            LifecycleEvent::StepEnd {
                test_id,
                title,
                error,
            } => self.on_step_end(test_id, title, error.as_ref()),
            LifecycleEvent::TestEnd {
                test_id,
                status,
                errors,
            } => self.on_test_end(test_id, *status, errors),
            LifecycleEvent::RunEnd => self.on_run_end()?,
        };

        if let EventOutcome::Ignored(reason) = &outcome {
            log::debug!("Ignored {} event: {:?}", event.name(), reason);
        }

        Ok(outcome)
    }

    /// Seed one pending entry per enumerated test
    pub fn on_run_begin(&mut self, tests: &[TestCase]) -> EventOutcome {
        if self.phase != RunPhase::Idle {
            return EventOutcome::Ignored(IgnoreReason::OutOfPhase(self.phase));
        }

        self.tests = tests
            .iter()
            .map(|test| TestState::new(&test.id, &test.title))
            .collect();
        self.phase = RunPhase::Running;

        EventOutcome::Applied
    }

    pub fn on_step_begin(
        &mut self,
        test_id: &str,
        title: &str,
        category: StepCategory,
    ) -> EventOutcome {
        if category != StepCategory::TestStep {
            return EventOutcome::Ignored(IgnoreReason::NotUserStep);
        }

        match self.test_mut(test_id) {
            Ok(test) => {
                test.begin_step(title);
                EventOutcome::Applied
            }
            Err(reason) => EventOutcome::Ignored(reason),
        }
    }

    pub fn on_step_end(
        &mut self,
        test_id: &str,
        title: &str,
        error: Option<&TestError>,
    ) -> EventOutcome {
        let test = match self.test_mut(test_id) {
            Ok(test) => test,
            Err(reason) => return EventOutcome::Ignored(reason),
        };

        let Some(step) = test.step_mut(title) else {
            return EventOutcome::Ignored(IgnoreReason::UnknownStep {
                test_id: test_id.to_string(),
                title: title.to_string(),
            });
        };

        step.pass = error.is_none();
        step.error = parse_error(error);

        EventOutcome::Applied
    }

    pub fn on_test_end(
        &mut self,
        test_id: &str,
        status: TestStatus,
        errors: &[TestError],
    ) -> EventOutcome {
        let test = match self.test_mut(test_id) {
            Ok(test) => test,
            Err(reason) => return EventOutcome::Ignored(reason),
        };

        let parsed: Vec<ParsedError> = errors
            .iter()
            .filter_map(|error| parse_error(Some(error)))
            .collect();

        // A failure without any parseable diagnostic leaves `errors` unset
        let errors = if parsed.is_empty() { None } else { Some(parsed) };

        test.resolve(status == TestStatus::Passed, errors);

        EventOutcome::Applied
    }

    /// Stamp the report and write it to the output. Terminal: later events
    /// are ignored.
    pub fn on_run_end(&mut self) -> serde_json::Result<EventOutcome> {
        if self.phase != RunPhase::Running {
            return Ok(EventOutcome::Ignored(IgnoreReason::OutOfPhase(self.phase)));
        }

        let report = TestRunReport {
            created_at: Some(Utc::now()),
            tests: self.tests.iter().map(TestState::to_report).collect(),
        };

        serde_json::to_writer(&mut self.output, &report)?;
        writeln!(self.output).map_err(serde_json::Error::io)?;
        self.output.flush().map_err(serde_json::Error::io)?;

        self.phase = RunPhase::Finalized;
        self.report = Some(report);

        Ok(EventOutcome::Applied)
    }

    /// The finalized report, once the run has ended
    pub fn report(&self) -> Option<&TestRunReport> {
        self.report.as_ref()
    }

    pub fn into_report(self) -> Option<TestRunReport> {
        self.report
    }

    fn test_mut(&mut self, test_id: &str) -> Result<&mut TestState, IgnoreReason> {
        if self.phase != RunPhase::Running {
            return Err(IgnoreReason::OutOfPhase(self.phase));
        }

        self.tests
            .iter_mut()
            .find(|test| test.id == test_id)
            .ok_or_else(|| IgnoreReason::UnknownTest(test_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::Report;

    fn begin(reporter: &mut StepReporter<Vec<u8>>) {
        let tests = vec![
            TestCase::new("t1", "first"),
            TestCase::new("t2", "second"),
        ];
        assert!(reporter.on_run_begin(&tests).is_applied());
    }

    #[test]
    fn test_run_begin_seeds_pending_entries() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);
        assert_eq!(reporter.phase(), RunPhase::Running);

        reporter.on_run_end().unwrap();
        let report = reporter.report().unwrap();

        assert!(report.created_at.is_some());
        assert_eq!(report.tests.len(), 2);
        assert!(report.is_requirements_only());
        assert_eq!(report.tests[0].id(), "t1");
        assert_eq!(report.tests[1].title(), "second");
    }

    #[test]
    fn test_internal_steps_are_not_reported() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        for category in [StepCategory::Hook, StepCategory::Fixture, StepCategory::PwApi] {
            assert_eq!(
                reporter.on_step_begin("t1", "Before Hooks", category),
                EventOutcome::Ignored(IgnoreReason::NotUserStep)
            );
        }
    }

    #[test]
    fn test_unknown_test_is_ignored() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        let unknown = EventOutcome::Ignored(IgnoreReason::UnknownTest("nope".to_string()));
        assert_eq!(
            reporter.on_step_begin("nope", "step", StepCategory::TestStep),
            unknown
        );
        assert_eq!(reporter.on_step_end("nope", "step", None), unknown);
        assert_eq!(
            reporter.on_test_end("nope", TestStatus::Passed, &[]),
            unknown
        );
    }

    #[test]
    fn test_unknown_step_is_ignored() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        assert_eq!(
            reporter.on_step_end("t1", "never began", None),
            EventOutcome::Ignored(IgnoreReason::UnknownStep {
                test_id: "t1".to_string(),
                title: "never began".to_string(),
            })
        );
    }

    #[test]
    fn test_interrupted_test_keeps_its_steps() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        reporter.on_step_begin("t1", "open the page", StepCategory::TestStep);
        assert!(reporter.on_step_end("t1", "open the page", None).is_applied());
        reporter.on_run_end().unwrap();

        let report = reporter.into_report().unwrap();
        let interrupted = report.find("t1").unwrap();
        assert_eq!(interrupted.pass(), None);
        assert_eq!(interrupted.steps().len(), 1);
        assert_eq!(interrupted.steps()[0].title, "open the page");
        assert!(interrupted.steps()[0].pass);

        assert!(report.find("t2").unwrap().is_requirement());
    }

    #[test]
    fn test_events_before_begin_are_ignored() {
        let mut reporter = StepReporter::new(Vec::new());

        assert_eq!(
            reporter.on_step_begin("t1", "step", StepCategory::TestStep),
            EventOutcome::Ignored(IgnoreReason::OutOfPhase(RunPhase::Idle))
        );
        assert_eq!(
            reporter.on_run_end().unwrap(),
            EventOutcome::Ignored(IgnoreReason::OutOfPhase(RunPhase::Idle))
        );
        assert!(reporter.report().is_none());
    }

    #[test]
    fn test_interleaved_tests_resolve_by_id() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        reporter.on_step_begin("t1", "open", StepCategory::TestStep);
        reporter.on_step_begin("t2", "open", StepCategory::TestStep);
        reporter.on_step_end("t2", "open", None);
        reporter.on_step_end(
            "t1",
            "open",
            Some(&TestError::with_message("Error: navigation failed")),
        );
        reporter.on_test_end("t2", TestStatus::Passed, &[]);
        reporter.on_test_end(
            "t1",
            TestStatus::Failed,
            &[TestError::with_message("Error: navigation failed")],
        );
        reporter.on_run_end().unwrap();

        let report = reporter.into_report().unwrap();
        let first = report.find("t1").and_then(Report::as_verification).unwrap();
        let second = report.find("t2").and_then(Report::as_verification).unwrap();

        assert!(!first.pass);
        assert!(!first.steps[0].pass);
        assert_eq!(
            first.steps[0].error.as_ref().unwrap().message.as_deref(),
            Some("navigation failed")
        );
        assert_eq!(first.errors.as_ref().unwrap().len(), 1);

        assert!(second.pass);
        assert!(second.steps[0].pass);
        assert!(second.steps[0].error.is_none());
        assert!(second.errors.is_none());
    }

    #[test]
    fn test_failure_without_parseable_errors_leaves_errors_unset() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);

        reporter.on_test_end("t1", TestStatus::TimedOut, &[TestError::default()]);
        reporter.on_run_end().unwrap();

        let report = reporter.into_report().unwrap();
        let test = report.find("t1").and_then(Report::as_verification).unwrap();
        assert!(!test.pass);
        assert!(test.errors.is_none());
    }

    #[test]
    fn test_run_end_writes_single_document_and_finalizes() {
        let mut reporter = StepReporter::new(Vec::new());
        begin(&mut reporter);
        reporter.on_run_end().unwrap();

        assert_eq!(reporter.phase(), RunPhase::Finalized);
        assert_eq!(
            reporter.on_test_end("t1", TestStatus::Passed, &[]),
            EventOutcome::Ignored(IgnoreReason::OutOfPhase(RunPhase::Finalized))
        );
        assert!(!reporter.on_run_end().unwrap().is_applied());

        let output = String::from_utf8(reporter.output.clone()).unwrap();
        assert_eq!(output.lines().count(), 1);

        let written: TestRunReport = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(Some(&written), reporter.report());
    }

    #[test]
    fn test_separate_reporters_do_not_share_state() {
        let mut one = StepReporter::new(Vec::new());
        let mut two = StepReporter::new(Vec::new());
        begin(&mut one);

        assert_eq!(
            two.on_test_end("t1", TestStatus::Passed, &[]),
            EventOutcome::Ignored(IgnoreReason::OutOfPhase(RunPhase::Idle))
        );
        assert!(one.on_test_end("t1", TestStatus::Passed, &[]).is_applied());
    }
}
