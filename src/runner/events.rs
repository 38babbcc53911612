use serde::{Deserialize, Serialize};

pub use crate::parser::error::TestError;

/// Category of a test step. Only [`StepCategory::TestStep`] is user-visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCategory {
    #[serde(rename = "test.step")]
    TestStep,
    #[serde(rename = "hook")]
    Hook,
    #[serde(rename = "fixture")]
    Fixture,
    #[serde(rename = "expect")]
    Expect,
    #[serde(rename = "pw:api")]
    PwApi,
    #[serde(other)]
    Other,
}

/// Final status of a test as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
    Interrupted,
}

/// A test as enumerated at run start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
}

impl TestCase {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// Lifecycle events emitted by the engine during one run.
///
/// Serialized as one JSON object per line, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LifecycleEvent {
    #[serde(rename_all = "camelCase")]
    RunBegin { tests: Vec<TestCase> },

    #[serde(rename_all = "camelCase")]
    StepBegin {
        test_id: String,
        title: String,
        category: StepCategory,
    },

    #[serde(rename_all = "camelCase")]
    StepEnd {
        test_id: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<TestError>,
    },

    #[serde(rename_all = "camelCase")]
    TestEnd {
        test_id: String,
        status: TestStatus,
        #[serde(default)]
        errors: Vec<TestError>,
    },

    RunEnd,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::RunBegin { .. } => "runBegin",
            LifecycleEvent::StepBegin { .. } => "stepBegin",
            LifecycleEvent::StepEnd { .. } => "stepEnd",
            LifecycleEvent::TestEnd { .. } => "testEnd",
            LifecycleEvent::RunEnd => "runEnd",
        }
    }
}
