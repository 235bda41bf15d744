//! Subprocess execution for assembled commands.
//!
//! One fresh subprocess per invocation, run to completion. Dry runs never
//! spawn anything: the transcript records what would have executed instead.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::core::command::{SvnCommand, SvnConfig};
use crate::core::error::SvnError;
use crate::core::transcript::Transcript;

/// Execute (or, for dry runs, merely render) the command.
///
/// The echo line always lands first. Under `verbose` or `dryrun` the stable
/// `[vector, spawn-config]` rendering follows at index 1. Real runs then
/// stream combined stdout/stderr into the transcript line-by-line in
/// arrival order and report the child's real exit status; `None` means the
/// child died without one.
pub fn run(
    command: &SvnCommand,
    config: &SvnConfig,
    sink: &mut Transcript,
) -> Result<Option<i32>, SvnError> {
    sink.push(command.echo_line());
    if command.dry_run() || command.verbose() {
        sink.push(command.rendering());
    }
    if command.dry_run() {
        return Ok(Some(0));
    }

    let stdin_payload = command.spawn_config().stdin.clone();
    let mut child = Command::new(&config.binary)
        .args(command.spawn_args())
        .stdin(if stdin_payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => SvnError::Config(format!(
                "svn binary `{}` was not found; install Subversion or point SvnConfig at a valid binary",
                config.binary.display()
            )),
            _ => SvnError::Io(error),
        })?;

    // Secrets go down a pipe, never onto the command line, when the tool
    // is stdin-capable. The writer runs detached so a child that never
    // reads stdin cannot deadlock us.
    if let Some(payload) = stdin_payload {
        if let Some(mut stdin) = child.stdin.take() {
            thread::spawn(move || {
                let _ = stdin.write_all(payload.as_bytes());
            });
        }
    }

    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(reader_thread(stdout, Arc::clone(&lines)));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(reader_thread(stderr, Arc::clone(&lines)));
    }
    for reader in readers {
        let _ = reader.join();
    }

    let status = child.wait()?;
    if let Ok(collected) = lines.lock() {
        for line in collected.iter() {
            sink.push(line.clone());
        }
    }

    Ok(status.code())
}

fn reader_thread<R>(source: R, lines: Arc<Mutex<Vec<String>>>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let buffered = BufReader::new(source);
        for line in buffered.lines() {
            let Ok(line) = line else { break };
            if let Ok(mut collected) = lines.lock() {
                collected.push(line);
            }
        }
    })
}
