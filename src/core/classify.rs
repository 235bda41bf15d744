//! Two-level failure classification and the public entry points.
//!
//! Failures exist at two independent levels: the subprocess exit status,
//! and structured `svn: ENNNNNN:` protocol codes embedded in the output.
//! The raw entry point ([`exec`]) surfaces the exit status verbatim and
//! leaves protocol lines in the transcript for callers that branch on
//! cause. The fail-fast entry point ([`exec_reported`]) renders any
//! failure into the sink itself and yields `None`: already surfaced, the
//! caller does not branch further.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::core::command::{SvnCommand, SvnConfig, SvnOptions};
use crate::core::error::SvnError;
use crate::core::runner;
use crate::core::transcript::Transcript;

fn protocol_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"svn: (E\d{6}):").expect("static pattern"))
}

/// Extract the first embedded protocol error code (e.g. `E200009`), if any.
pub fn protocol_error(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        protocol_code_pattern()
            .captures(line)
            .map(|captures| captures[1].to_string())
    })
}

fn validate_presence<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, SvnError> {
    value.ok_or_else(|| SvnError::validation(message))
}

/// Raw entry point: validate, build, run, and return the exit status
/// verbatim alongside the transcript written into `sink`.
///
/// Construction errors (absent subcommand/target/sink, unrecognized option
/// keys, malformed `args`) are returned before any transcript line is
/// produced. A non-zero status is the caller's to inspect.
pub fn exec(
    subcommand: Option<&str>,
    target: Option<&str>,
    sink: Option<&mut Transcript>,
    options: &Value,
    config: &SvnConfig,
) -> Result<Option<i32>, SvnError> {
    let subcommand = validate_presence(subcommand, "command must not be nil")?;
    let target = validate_presence(target, "path must not be nil")?;
    let sink = sink.ok_or_else(|| SvnError::validation("diagnostic sink must not be nil"))?;
    let options = SvnOptions::from_value(options)?;
    exec_typed(subcommand, target, sink, &options, config)
}

/// Typed counterpart of [`exec`] for callers that already hold validated
/// options.
pub fn exec_typed(
    subcommand: &str,
    target: &str,
    sink: &mut Transcript,
    options: &SvnOptions,
    config: &SvnConfig,
) -> Result<Option<i32>, SvnError> {
    let command = SvnCommand::build(subcommand, target, options, config)?;
    runner::run(&command, config, sink)
}

/// Typed entry with an extra positional destination after the target,
/// used by the update workflow's checkout step.
pub(crate) fn exec_with_destination(
    subcommand: &str,
    target: &str,
    destination: &str,
    sink: &mut Transcript,
    options: &SvnOptions,
    config: &SvnConfig,
) -> Result<Option<i32>, SvnError> {
    let command =
        SvnCommand::build_with_destination(subcommand, target, Some(destination), options, config)?;
    runner::run(&command, config, sink)
}

/// Fail-fast entry point: on any failure the error is rendered into the
/// sink as a completed user-facing report and `None` is returned. Success
/// passes the zero status through.
pub fn exec_reported(
    subcommand: Option<&str>,
    target: Option<&str>,
    sink: Option<&mut Transcript>,
    options: &Value,
    config: &SvnConfig,
) -> Result<Option<i32>, SvnError> {
    let subcommand = validate_presence(subcommand, "command must not be nil")?;
    let target = validate_presence(target, "path must not be nil")?;
    let sink = sink.ok_or_else(|| SvnError::validation("diagnostic sink must not be nil"))?;
    let options = SvnOptions::from_value(options)?;
    exec_reported_typed(subcommand, target, sink, &options, config)
}

/// Typed counterpart of [`exec_reported`].
pub fn exec_reported_typed(
    subcommand: &str,
    target: &str,
    sink: &mut Transcript,
    options: &SvnOptions,
    config: &SvnConfig,
) -> Result<Option<i32>, SvnError> {
    let status = exec_typed(subcommand, target, sink, options, config)?;
    match status {
        Some(0) => Ok(Some(0)),
        other => {
            report_failure(subcommand, other, sink);
            Ok(None)
        }
    }
}

/// Render a completed failure report into the sink.
fn report_failure(subcommand: &str, status: Option<i32>, sink: &mut Transcript) {
    let status_text = match status {
        Some(code) => format!("exit status {code}"),
        None => "no exit status".to_string(),
    };
    sink.push(format!("svn {subcommand} failed: {status_text}"));
    if let Some(code) = protocol_error(sink.lines()) {
        sink.push(format!("svn reported error code {code}"));
    }
}
