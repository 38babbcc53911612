use crate::report::types::{
    ParsedError, Report, Requirement, StepReport, TestReport, UnresolvedTest,
};

/// Phase of a reporter run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Finalized,
}

/// Resolution of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResolution {
    Pending,
    Passed,
    Failed,
}

/// In-progress state for one test of the run
#[derive(Debug, Clone)]
pub struct TestState {
    pub id: String,
    pub title: String,
    pub status: TestResolution,
    pub steps: Vec<StepReport>,
    pub errors: Option<Vec<ParsedError>>,
}

impl TestState {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            status: TestResolution::Pending,
            steps: Vec::new(),
            errors: None,
        }
    }

    pub fn begin_step(&mut self, title: &str) {
        self.steps.push(StepReport::new(title));
    }

    /// First step with a matching title. Duplicate titles resolve to the first.
    pub fn step_mut(&mut self, title: &str) -> Option<&mut StepReport> {
        self.steps.iter_mut().find(|step| step.title == title)
    }

    pub fn resolve(&mut self, passed: bool, errors: Option<Vec<ParsedError>>) {
        self.status = if passed {
            TestResolution::Passed
        } else {
            TestResolution::Failed
        };
        self.errors = errors;
    }

    /// Serialize state for reporting.
    ///
    /// A pending test keeps the steps it started; without any it is a plain
    /// requirement.
    pub fn to_report(&self) -> Report {
        match self.status {
            TestResolution::Pending if self.steps.is_empty() => {
                Report::Requirement(Requirement {
                    id: self.id.clone(),
                    title: self.title.clone(),
                })
            }
            TestResolution::Pending => Report::Unresolved(UnresolvedTest {
                id: self.id.clone(),
                title: self.title.clone(),
                steps: self.steps.clone(),
            }),
            TestResolution::Passed | TestResolution::Failed => {
                Report::Verification(TestReport {
                    id: self.id.clone(),
                    title: self.title.clone(),
                    pass: self.status == TestResolution::Passed,
                    steps: self.steps.clone(),
                    errors: self.errors.clone(),
                })
            }
        }
    }
}

/// Why an event was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event does not fit the current run phase
    OutOfPhase(RunPhase),
    /// Hook, fixture and other internal steps are not reported
    NotUserStep,
    UnknownTest(String),
    UnknownStep { test_id: String, title: String },
}

/// Result of feeding one event to the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl EventOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EventOutcome::Applied)
    }
}
