//! Normalizes engine diagnostics into [`ParsedError`] values.
//!
//! The engine pretty-prints assertion failures with ANSI styling, e.g.
//!
//! ```text
//! Error: The page title is wrong.
//!
//! Expected pattern: /.*Playwight/
//! Received string:  "Fast and reliable end-to-end testing for modern web apps | Playwright"
//! ```
//!
//! Only three line prefixes are recognised. Anything else is ignored, so an
//! unfamiliar format degrades to an all-empty result instead of an error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::report::types::ParsedError;

const MESSAGE_PREFIX: &str = "Error:";
const EXPECTED_PREFIX: &str = "Expected pattern:";
const ACTUAL_PREFIX: &str = "Received string:";

/// A raw diagnostic as emitted by the test engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TestError {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

fn ansi_regex() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ANSI pattern is valid"))
}

/// Strip ANSI color/style sequences
pub fn strip_ansi(text: &str) -> String {
    ansi_regex().replace_all(text, "").into_owned()
}

/// Parse a raw diagnostic. Returns `None` when there is no message to parse.
pub fn parse_error(error: Option<&TestError>) -> Option<ParsedError> {
    let message = error?.message.as_deref()?;
    Some(parse_message(message))
}

/// Parse diagnostic text. Later occurrences of a prefix overwrite earlier ones.
pub fn parse_message(message: &str) -> ParsedError {
    let cleaned = strip_ansi(message);
    let mut parsed = ParsedError::default();

    let lines = cleaned
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty());

    for line in lines {
        if let Some(rest) = line.strip_prefix(MESSAGE_PREFIX) {
            parsed.message = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(EXPECTED_PREFIX) {
            parsed.expected = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(ACTUAL_PREFIX) {
            parsed.actual = Some(unquote(rest.trim()).to_string());
        }
    }

    parsed
}

/// Remove one leading and one trailing double quote, if present
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}
