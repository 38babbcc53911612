//! External command execution.
//!
//! A command is a template (e.g. `npx playwright test`) split into argv
//! tokens, plus parameters appended as separate tokens. Nothing goes through a
//! shell.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command as ProcessCommand;

use crate::error::ExecutionError;

/// The commands that can be run against the test engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Runs the suite (`npx playwright test`)
    Test,
    /// Enumerates the suite without running it (`npx playwright test --list`)
    List,
}

impl Command {
    pub const fn default_template(self) -> &'static str {
        match self {
            Command::Test => "npx playwright test",
            Command::List => "npx playwright test --list",
        }
    }
}

/// A parsed command template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split a template into program and base arguments
    pub fn parse(template: &str) -> Result<Self, ExecutionError> {
        let mut tokens =
            shell_words::split(template).map_err(|e| ExecutionError::InvalidTemplate {
                template: template.to_string(),
                reason: e.to_string(),
            })?;

        if tokens.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let program = tokens.remove(0);
        Ok(Self {
            program,
            args: tokens,
        })
    }

    /// Human-readable form with parameters appended, for logs and errors
    pub fn display_with(&self, parameters: &[String]) -> String {
        let words = std::iter::once(&self.program)
            .chain(&self.args)
            .chain(parameters);
        shell_words::join(words)
    }
}

/// Captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a command to completion
#[async_trait]
pub trait Execute: Send + Sync {
    async fn run(
        &self,
        command: &CommandLine,
        parameters: &[String],
    ) -> Result<ProcessResult, ExecutionError>;
}

/// Runs commands as child processes
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Working directory of the child, defaults to ours
    pub working_dir: Option<PathBuf>,
    /// Extra environment for the child
    pub env: Vec<(String, String)>,
}

impl CommandRunner {
    pub fn new(working_dir: Option<PathBuf>, env: Vec<(String, String)>) -> Self {
        Self { working_dir, env }
    }

    fn resolve_program(&self, program: &str) -> Result<PathBuf, ExecutionError> {
        let cwd = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_default(),
        };

        which::which_in(program, std::env::var_os("PATH"), cwd).map_err(|_| {
            ExecutionError::EngineNotFound {
                program: program.to_string(),
            }
        })
    }
}

#[async_trait]
impl Execute for CommandRunner {
    async fn run(
        &self,
        command: &CommandLine,
        parameters: &[String],
    ) -> Result<ProcessResult, ExecutionError> {
        let rendered = command.display_with(parameters);
        let program = self.resolve_program(&command.program)?;

        let mut child = ProcessCommand::new(program);
        child
            .args(&command.args)
            .args(parameters)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_dir {
            child.current_dir(dir);
        }

        log::info!("Running: {}", rendered);

        let output = child
            .output()
            .await
            .map_err(|source| ExecutionError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let result = ProcessResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        log::info!("'{}' finished with {}", rendered, output.status);

        // A failing exit with a report on stdout only means some tests failed
        if !output.status.success() && result.stdout.trim().is_empty() {
            return Err(ExecutionError::Failed {
                command: rendered,
                status: output.status.to_string(),
                stderr: result.stderr.trim().to_string(),
            });
        }

        if !result.stderr.trim().is_empty() {
            log::debug!("'{}' stderr:\n{}", rendered, result.stderr);
        }

        Ok(result)
    }
}
