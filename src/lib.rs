pub mod api;
pub mod command;
pub mod error;
pub mod mission;
pub mod parser;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use error::{ExecutionError, MalformedOutputError, MissionError};
pub use mission::{MissionService, Mode};
pub use report::types::TestRunReport;
pub use runner::StepReporter;
