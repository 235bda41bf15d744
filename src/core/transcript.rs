//! The diagnostic sink: an ordered log of lines produced by (or instead of)
//! a command execution.
//!
//! Every entry point writes into a `Transcript` owned by the caller. The
//! core treats it as a pure output collector; callers may serialize it
//! (the JSON form mirrors the legacy `{"transcript": [...]}` envelope) or
//! inspect individual lines, e.g. to match protocol error codes.

use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Transcript {
    transcript: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.transcript.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.transcript
    }

    pub fn last(&self) -> Option<&str> {
        self.transcript.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "transcript": self.transcript })
    }
}
