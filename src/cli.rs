//! CLI struct definitions for the svncmd command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs::run`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "svncmd",
    version = env!("CARGO_PKG_VERSION"),
    about = "Audited command-execution layer for the Subversion CLI"
)]
pub(crate) struct Cli {
    /// Path to the svn binary.
    #[clap(long, global = true)]
    pub svn_bin: Option<PathBuf>,
    /// TOML registry mapping short repository names to root URLs.
    #[clap(long, global = true)]
    pub registry: Option<PathBuf>,
    /// Emit the transcript as a `{"transcript": [...]}` JSON envelope
    /// instead of raw lines.
    #[clap(long, global = true)]
    pub json: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run a single svn subcommand against a target.
    Exec(ExecCli),
    /// Check out a file, transform it, and commit the result.
    Update(UpdateCli),
}

#[derive(clap::Args, Debug)]
pub(crate) struct ExecCli {
    /// svn subcommand, e.g. `info` or `status`.
    pub subcommand: String,
    /// Target path, URL, or registry short name (`name/relative/path`).
    pub target: String,
    /// Extra literal arguments appended before the `--` separator.
    #[clap(long = "arg")]
    pub args: Vec<String>,
    /// Shorthand for the svn `--depth <value>` argument.
    #[clap(long)]
    pub depth: Option<String>,
    /// Shorthand for the svn `--message <value>` argument.
    #[clap(long, short = 'm')]
    pub message: Option<String>,
    #[clap(long)]
    pub username: Option<String>,
    #[clap(long)]
    pub password: Option<String>,
    /// Echo the assembled command, credential flags included, into the
    /// transcript.
    #[clap(long, short = 'v')]
    pub verbose: bool,
    /// Render what would run instead of spawning anything.
    #[clap(long)]
    pub dry_run: bool,
    /// Report failures into the transcript instead of via the exit code.
    #[clap(long)]
    pub report: bool,
}

#[derive(clap::Args, Debug)]
pub(crate) struct UpdateCli {
    /// Target file path, URL, or registry short name.
    pub target: String,
    /// Commit message.
    #[clap(long, short = 'm')]
    pub message: String,
    /// Line to append to the file (repeatable); the built-in transform.
    #[clap(long = "append")]
    pub append: Vec<String>,
    #[clap(long)]
    pub username: Option<String>,
    #[clap(long)]
    pub password: Option<String>,
    #[clap(long, short = 'v')]
    pub verbose: bool,
    #[clap(long)]
    pub dry_run: bool,
}
