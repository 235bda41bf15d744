//! The checkout → transform → commit workflow.
//!
//! A read-modify-write transaction over a non-transactional CLI: each call
//! owns a scoped temporary working copy, removed on every exit path. A
//! commit racing against a stale checkout fails at commit time and is
//! surfaced through the ordinary status/transcript contract; nothing here
//! coordinates concurrent callers.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::core::classify;
use crate::core::command::{SvnConfig, SvnOptions};
use crate::core::credentials::Credential;
use crate::core::error::SvnError;
use crate::core::transcript::Transcript;

#[derive(Debug, Default, Clone)]
pub struct UpdateOptions {
    pub dryrun: bool,
    pub verbose: bool,
    /// Contents the transform sees under `dryrun`, standing in for the
    /// checkout that never happens. Defaults to empty.
    pub initial_contents: Option<String>,
}

/// Check out `target`, apply `transform` to its contents, record a diff
/// summary, and commit the result with `message`.
///
/// `transform` receives the working-copy directory and the current file
/// contents and returns the new contents. Under `dryrun` the checkout and
/// commit are rendered rather than executed, and the transform runs
/// against `options.initial_contents`; the diff summary is computed either
/// way, so the whole workflow can be exercised without touching the
/// remote.
pub fn update<F>(
    target: &str,
    message: &str,
    credential: Credential,
    sink: Option<&mut Transcript>,
    options: &UpdateOptions,
    config: &SvnConfig,
    transform: F,
) -> Result<Option<i32>, SvnError>
where
    F: FnOnce(&Path, &str) -> String,
{
    let sink = sink.ok_or_else(|| SvnError::validation("diagnostic sink must not be nil"))?;
    let (parent, basename) = split_target(target)?;

    // Removed on drop, on every exit path.
    let workdir = TempDir::new()?;
    let workdir_path = workdir.path();
    let checkout_to = workdir_path.to_string_lossy().to_string();
    let local_file = workdir_path.join(basename);

    let base = SvnOptions {
        verbose: options.verbose,
        dryrun: options.dryrun,
        ..Default::default()
    }
    .with_credential(&credential);

    let checkout = SvnOptions {
        depth: Some("empty".to_string()),
        ..base.clone()
    };
    let status = classify::exec_with_destination(
        "checkout",
        parent,
        &checkout_to,
        sink,
        &checkout,
        config,
    )?;
    if status != Some(0) {
        return Ok(status);
    }

    let local_target = local_file.to_string_lossy().to_string();
    if !options.dryrun {
        let status = classify::exec_typed("update", &local_target, sink, &base, config)?;
        if status != Some(0) {
            return Ok(status);
        }
    }

    let contents = if options.dryrun {
        options.initial_contents.clone().unwrap_or_default()
    } else {
        fs::read_to_string(&local_file)?
    };

    let updated = transform(workdir_path, &contents);

    if !options.dryrun {
        fs::write(&local_file, &updated)?;
    }

    for line in diff_summary(&contents, &updated) {
        sink.push(line);
    }

    if options.dryrun {
        // The commit is suppressed entirely; the diff above is the record
        // of what would have been committed.
        return Ok(Some(0));
    }

    let commit = SvnOptions {
        msg: Some(message.to_string()),
        ..base
    };
    classify::exec_typed("commit", &local_target, sink, &commit, config)
}

fn split_target(target: &str) -> Result<(&str, &str), SvnError> {
    match target.trim_end_matches('/').rsplit_once('/') {
        Some((parent, basename)) if !parent.is_empty() && !basename.is_empty() => {
            Ok((parent, basename))
        }
        _ => Err(SvnError::Config(format!(
            "update target '{target}' has no parent location"
        ))),
    }
}

/// Concise unified-diff-style summary: changed lines from the common
/// middle, removals prefixed `-`, additions prefixed `+`.
pub fn diff_summary(old: &str, new: &str) -> Vec<String> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let mut start = 0;
    while start < old_lines.len()
        && start < new_lines.len()
        && old_lines[start] == new_lines[start]
    {
        start += 1;
    }

    let mut old_end = old_lines.len();
    let mut new_end = new_lines.len();
    while old_end > start && new_end > start && old_lines[old_end - 1] == new_lines[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    let mut summary = Vec::new();
    for line in &old_lines[start..old_end] {
        summary.push(format!("-{line}"));
    }
    for line in &new_lines[start..new_end] {
        summary.push(format!("+{line}"));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appended_line_shows_as_single_addition() {
        let old = "alpha\nbeta\n";
        let new = "alpha\nbeta\ntest\n";
        assert_eq!(diff_summary(old, new), ["+test"]);
    }

    #[test]
    fn replaced_line_shows_removal_then_addition() {
        let old = "alpha\nbeta\ngamma\n";
        let new = "alpha\nBETA\ngamma\n";
        assert_eq!(diff_summary(old, new), ["-beta", "+BETA"]);
    }

    #[test]
    fn identical_contents_produce_no_summary() {
        assert!(diff_summary("same\n", "same\n").is_empty());
    }

    #[test]
    fn split_target_requires_a_parent() {
        assert!(split_target("lonely").is_err());
        let (parent, basename) =
            split_target("https://svn.example.org/repos/site/_template.xml").unwrap();
        assert_eq!(parent, "https://svn.example.org/repos/site");
        assert_eq!(basename, "_template.xml");
    }
}
