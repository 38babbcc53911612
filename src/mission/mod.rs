//! Mission verification.
//!
//! Maps a mission id and a [`Mode`] to an engine command, runs it, and
//! assembles the report from its stdout.

pub mod assembler;

use std::sync::Arc;

use crate::command::{Command, CommandLine, CommandRunner, Execute};
use crate::error::{ExecutionError, Result};
use crate::report::types::TestRunReport;
use crate::utils::config::Config;

/// What to do with a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the mission's tests
    Verify,
    /// Enumerate the mission's tests without running them
    Requirements,
}

impl Mode {
    pub fn command(self) -> Command {
        match self {
            Mode::Verify => Command::Test,
            Mode::Requirements => Command::List,
        }
    }
}

pub struct MissionService {
    runner: Arc<dyn Execute>,
    verify: CommandLine,
    list: CommandLine,
}

impl MissionService {
    /// Create a service with the command templates from `config`
    pub fn new(
        runner: Arc<dyn Execute>,
        config: &Config,
    ) -> std::result::Result<Self, ExecutionError> {
        Ok(Self {
            runner,
            verify: CommandLine::parse(config.template(Command::Test))?,
            list: CommandLine::parse(config.template(Command::List))?,
        })
    }

    /// Create a service that spawns the engine as configured
    pub fn from_config(config: &Config) -> std::result::Result<Self, ExecutionError> {
        let runner = CommandRunner::new(config.suite_dir.clone(), config.target.child_env());
        Self::new(Arc::new(runner), config)
    }

    /// Verify the provided mission
    pub async fn verify(&self, mission_id: &str) -> Result<TestRunReport> {
        self.run(Mode::Verify, mission_id).await
    }

    /// List the tests of the provided mission, ids and titles only
    pub async fn list_requirements(&self, mission_id: &str) -> Result<TestRunReport> {
        self.run(Mode::Requirements, mission_id).await
    }

    pub async fn run(&self, mode: Mode, mission_id: &str) -> Result<TestRunReport> {
        let command = match mode.command() {
            Command::Test => &self.verify,
            Command::List => &self.list,
        };

        log::info!("{:?} mission '{}'", mode, mission_id);

        let output = self.runner.run(command, &[mission_id.to_string()]).await?;
        let report = assembler::assemble(&output.stdout).map_err(|e| {
            log::error!("Mission '{}' produced malformed output: {}", mission_id, e);
            e
        })?;

        let report = match mode {
            Mode::Verify => report,
            Mode::Requirements => {
                if !report.is_requirements_only() {
                    log::warn!(
                        "Listing mission '{}' returned results; keeping ids and titles only",
                        mission_id
                    );
                }
                report.into_requirements()
            }
        };

        let summary = report.summary();
        log::info!(
            "Mission '{}': {} tests, {} passed, {} failed",
            mission_id,
            summary.total_tests,
            summary.passed,
            summary.failed
        );

        Ok(report)
    }
}
