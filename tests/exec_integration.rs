//! End-to-end execution against a scripted stand-in for the svn binary.
//!
//! The fake tool reproduces the output shapes the classifier cares about:
//! `Name:` lines from `info`, `E200009` protocol errors for missing
//! targets, and stdin-delivered secrets.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serde_json::json;
use svncmd::{exec, exec_reported, protocol_error, SvnConfig, Transcript};
use tempfile::TempDir;

const FAKE_SVN: &str = r#"#!/bin/sh
sub="$1"
for arg in "$@"; do last="$arg"; done
case "$sub" in
  info)
    case "$last" in
      */___)
        echo "svn: E200009: Could not display info for all targets because some targets don't exist" >&2
        exit 1
        ;;
      *)
        echo "Name: $(basename "$last")"
        ;;
    esac
    ;;
  whoami)
    read -r secret
    echo "secret=$secret"
    ;;
  chatter)
    echo "out: one"
    echo "err: two" >&2
    echo "out: three"
    ;;
  *)
    echo "ok: $sub"
    ;;
esac
"#;

fn install_fake_svn(dir: &Path) -> PathBuf {
    let script = dir.join("svn");
    fs::write(&script, FAKE_SVN).expect("write fake svn");
    let mut perms = fs::metadata(&script).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod fake svn");
    script
}

fn config(dir: &Path) -> SvnConfig {
    SvnConfig {
        binary: install_fake_svn(dir),
        password_from_stdin: true,
    }
}

#[test]
fn info_reports_name_line_and_zero_status() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec(
        Some("info"),
        Some("https://svn.example.org/repos/site/_template.xml"),
        Some(&mut sink),
        &json!({}),
        &config,
    )
    .expect("exec");

    assert_eq!(status, Some(0));
    assert!(sink.lines().contains(&"Name: _template.xml".to_string()));
}

#[test]
fn missing_target_surfaces_protocol_code_through_raw_entry() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec(
        Some("info"),
        Some("https://svn.example.org/repos/site/___"),
        Some(&mut sink),
        &json!({}),
        &config,
    )
    .expect("exec");

    assert_eq!(status, Some(1));
    assert!(sink.contains("svn: E200009:"));
    assert_eq!(protocol_error(sink.lines()).as_deref(), Some("E200009"));
}

#[test]
fn fail_fast_entry_reports_and_returns_no_status() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec_reported(
        Some("info"),
        Some("https://svn.example.org/repos/site/___"),
        Some(&mut sink),
        &json!({}),
        &config,
    )
    .expect("exec_reported");

    assert_eq!(status, None);
    assert!(sink.contains("svn info failed: exit status 1"));
    assert!(sink.contains("svn reported error code E200009"));
}

#[test]
fn fail_fast_entry_passes_success_through() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec_reported(
        Some("info"),
        Some("https://svn.example.org/repos/site/_template.xml"),
        Some(&mut sink),
        &json!({}),
        &config,
    )
    .expect("exec_reported");

    assert_eq!(status, Some(0));
    assert!(!sink.contains("failed"));
}

#[test]
fn secret_is_delivered_over_stdin_not_the_command_line() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec(
        Some("whoami"),
        Some("ignored"),
        Some(&mut sink),
        &json!({ "user": "user", "password": "hunter2" }),
        &config,
    )
    .expect("exec");

    assert_eq!(status, Some(0));
    // The child saw the secret on its stdin.
    assert!(sink.contains("secret=hunter2"));
    // The echo line carries neither the secret nor any credential flag.
    assert_eq!(sink.lines()[0], "$ svn whoami --non-interactive -- ignored");
}

#[test]
fn child_output_streams_into_the_transcript() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec(
        Some("chatter"),
        Some("ignored"),
        Some(&mut sink),
        &json!({}),
        &config,
    )
    .expect("exec");

    assert_eq!(status, Some(0));
    for line in ["out: one", "err: two", "out: three"] {
        assert!(sink.contains(line), "missing line: {line}");
    }
    // stdout ordering is preserved within its own stream.
    let position = |needle: &str| {
        sink.lines()
            .iter()
            .position(|line| line == needle)
            .expect("line present")
    };
    assert!(position("out: one") < position("out: three"));
}

#[test]
fn cli_emits_the_json_transcript_envelope() {
    let tmp = TempDir::new().expect("tempdir");
    let script = install_fake_svn(tmp.path());

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_svncmd"))
        .args([
            "--svn-bin",
            script.to_str().expect("script path"),
            "--json",
            "exec",
            "info",
            "https://svn.example.org/repos/site/_template.xml",
        ])
        .output()
        .expect("run svncmd");

    assert!(output.status.success());
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json envelope");
    let lines = envelope["transcript"].as_array().expect("transcript array");
    assert!(lines.iter().any(|line| line == "Name: _template.xml"));
}

#[test]
fn verbose_execution_echoes_the_rendering_before_output() {
    let tmp = TempDir::new().expect("tempdir");
    let config = config(tmp.path());
    let mut sink = Transcript::new();

    let status = exec(
        Some("whoami"),
        Some("ignored"),
        Some(&mut sink),
        &json!({ "user": "user", "password": "pass", "verbose": true }),
        &config,
    )
    .expect("exec");

    assert_eq!(status, Some(0));
    let expected = json!([
        [
            "svn",
            "whoami",
            "--non-interactive",
            ["--username", "user", "--no-auth-cache"],
            ["--password-from-stdin"],
            "--",
            "ignored"
        ],
        { "stdin": "pass" }
    ])
    .to_string();
    assert_eq!(sink.lines()[1], expected);
}
