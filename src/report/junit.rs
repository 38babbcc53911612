use super::types::{ParsedError, Report, TestReport, TestRunReport};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Generate JUnit XML report string from a run report
pub fn generate_junit_xml(report: &TestRunReport) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let summary = report.summary();
    let total = summary.total_tests.to_string();
    let failures = summary.failed.to_string();
    let skipped = summary.unresolved.to_string();
    let timestamp = report
        .created_at
        .map(|at| at.to_rfc3339())
        .unwrap_or_default();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "mission-runner"));
    suites_start.push_attribute(("tests", total.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("skipped", skipped.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    // A run is a single suite
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "mission"));
    suite_start.push_attribute(("tests", total.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", skipped.as_str()));
    if !timestamp.is_empty() {
        suite_start.push_attribute(("timestamp", timestamp.as_str()));
    }
    writer.write_event(Event::Start(suite_start))?;

    for test in &report.tests {
        write_test_case(&mut writer, test)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    Ok(String::from_utf8(result)?)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, test: &Report) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", test.title()));
    case_start.push_attribute(("classname", test.id()));
    writer.write_event(Event::Start(case_start))?;

    match test {
        Report::Requirement(_) => {
            let mut skipped = BytesStart::new("skipped");
            skipped.push_attribute(("message", "not run"));
            writer.write_event(Event::Empty(skipped))?;
        }
        Report::Unresolved(_) => {
            let mut skipped = BytesStart::new("skipped");
            skipped.push_attribute(("message", "did not finish"));
            writer.write_event(Event::Empty(skipped))?;
        }
        Report::Verification(result) if !result.pass => write_failure(writer, result)?,
        Report::Verification(_) => {}
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

fn write_failure<W: std::io::Write>(writer: &mut Writer<W>, test: &TestReport) -> Result<()> {
    let first_message = test
        .errors
        .iter()
        .flatten()
        .find_map(|error| error.message.as_deref())
        .unwrap_or("Test failed");

    let mut fail_start = BytesStart::new("failure");
    fail_start.push_attribute(("message", first_message));
    fail_start.push_attribute(("type", "AssertionError"));
    writer.write_event(Event::Start(fail_start))?;

    let details = failure_details(test);
    if !details.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&details)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("failure")))?;
    Ok(())
}

fn failure_details(test: &TestReport) -> String {
    let mut lines = Vec::new();

    for step in &test.steps {
        let mark = if step.pass { "passed" } else { "failed" };
        lines.push(format!("[{}] {}", mark, step.title));
        if let Some(error) = &step.error {
            push_error(&mut lines, error, "    ");
        }
    }

    for error in test.errors.iter().flatten() {
        push_error(&mut lines, error, "");
    }

    lines.join("\n")
}

fn push_error(lines: &mut Vec<String>, error: &ParsedError, indent: &str) {
    if let Some(message) = &error.message {
        lines.push(format!("{}Error: {}", indent, message));
    }
    if let Some(expected) = &error.expected {
        lines.push(format!("{}Expected: {}", indent, expected));
    }
    if let Some(actual) = &error.actual {
        lines.push(format!("{}Received: {}", indent, actual));
    }
}
