use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured form of an engine diagnostic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedError {
    /// The error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The expected value of the assertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    /// The actual value of the assertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ParsedError {
    /// True when none of the facets were recognised
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.expected.is_none() && self.actual.is_none()
    }
}

/// A user-visible step of a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub title: String,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ParsedError>,
}

impl StepReport {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            pass: false,
            error: None,
        }
    }
}

/// A test that was enumerated but never resolved (requirements listing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Requirement {
    pub id: String,
    pub title: String,
}

/// A test that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub id: String,
    pub title: String,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepReport>,
    /// Only present when the test failed with at least one parseable diagnostic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ParsedError>>,
}

/// A test that started steps but never ended, e.g. an interrupted run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnresolvedTest {
    pub id: String,
    pub title: String,
    pub steps: Vec<StepReport>,
}

/// Per-test entry of a run report.
///
/// On the wire every shape is a plain object. A `pass` field marks a
/// verification entry, `steps` without `pass` an unresolved one, and a bare
/// `{id, title}` a requirement. Anything else fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Verification(TestReport),
    Unresolved(UnresolvedTest),
    Requirement(Requirement),
}

impl Report {
    pub fn id(&self) -> &str {
        match self {
            Report::Verification(test) => &test.id,
            Report::Unresolved(test) => &test.id,
            Report::Requirement(requirement) => &requirement.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Report::Verification(test) => &test.title,
            Report::Unresolved(test) => &test.title,
            Report::Requirement(requirement) => &requirement.title,
        }
    }

    /// `None` unless the test ran to completion
    pub fn pass(&self) -> Option<bool> {
        self.as_verification().map(|test| test.pass)
    }

    pub fn as_verification(&self) -> Option<&TestReport> {
        match self {
            Report::Verification(test) => Some(test),
            _ => None,
        }
    }

    /// Steps recorded for the test, empty for requirements
    pub fn steps(&self) -> &[StepReport] {
        match self {
            Report::Verification(test) => &test.steps,
            Report::Unresolved(test) => &test.steps,
            Report::Requirement(_) => &[],
        }
    }

    pub fn is_requirement(&self) -> bool {
        matches!(self, Report::Requirement(_))
    }
}

/// Report of a whole engine run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunReport {
    /// Stamped once, when the run ends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Tests in the engine's enumeration order
    pub tests: Vec<Report>,
}

impl TestRunReport {
    pub fn find(&self, id: &str) -> Option<&Report> {
        self.tests.iter().find(|test| test.id() == id)
    }

    /// True when no entry carries verification data
    pub fn is_requirements_only(&self) -> bool {
        self.tests.iter().all(Report::is_requirement)
    }

    /// Reduce every entry to its requirement shape
    pub fn into_requirements(self) -> Self {
        let tests = self
            .tests
            .into_iter()
            .map(|test| match test {
                Report::Verification(TestReport { id, title, .. })
                | Report::Unresolved(UnresolvedTest { id, title, .. }) => {
                    Report::Requirement(Requirement { id, title })
                }
                requirement => requirement,
            })
            .collect();

        Self {
            created_at: self.created_at,
            tests,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total_tests: self.tests.len() as u32,
            ..RunSummary::default()
        };

        for test in &self.tests {
            match test.pass() {
                Some(true) => summary.passed += 1,
                Some(false) => summary.failed += 1,
                None => summary.unresolved += 1,
            }
        }

        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub unresolved: u32,
}
