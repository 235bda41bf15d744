//! svncmd: an audited command-execution layer for the Subversion CLI.
//!
//! The crate builds, executes, and audits invocations of the external
//! `svn` tool. It resolves credentials from competing sources, assembles
//! a fixed-order argument vector, classifies failure at two levels
//! (process exit status and embedded `ENNNNNN` protocol codes), and
//! layers an atomic checkout → transform → commit workflow on top of
//! single invocations.
//!
//! # Entry points
//!
//! - [`exec`] — raw: run one subcommand, return the exit status verbatim,
//!   transcript in the caller's [`Transcript`] sink.
//! - [`exec_reported`] — fail-fast: render any failure into the sink as a
//!   completed report and return `None` ("already surfaced").
//! - [`update`] — transactional read-modify-write against a scoped
//!   temporary working copy.
//!
//! # Security invariants
//!
//! - Secrets travel to the child over stdin when the tool supports
//!   `--password-from-stdin`; the inline flag is a compatibility fallback.
//! - Credential-bearing fragments never reach the transcript unless
//!   `verbose` is set; the invocation itself always runs with them.
//! - Dry runs (`dryrun`) never spawn a subprocess; the transcript records
//!   a stable rendering of the vector and spawn configuration instead.

pub mod core;

mod cli;

pub use crate::core::classify::{
    exec, exec_reported, exec_reported_typed, exec_typed, protocol_error,
};
pub use crate::core::command::{Arg, SpawnConfig, SvnCommand, SvnConfig, SvnOptions};
pub use crate::core::credentials::{Credential, EnvPair};
pub use crate::core::error::SvnError;
pub use crate::core::repos::Registry;
pub use crate::core::transcript::Transcript;
pub use crate::core::update::{update, UpdateOptions};

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Command, ExecCli, UpdateCli};

/// CLI dispatch. The binary in `src/main.rs` is a thin shim over this.
pub fn run() -> Result<(), SvnError> {
    let cli = Cli::parse();

    let config = match &cli.svn_bin {
        Some(binary) => SvnConfig::with_binary(binary.clone()),
        None => SvnConfig::default(),
    };
    let registry = match &cli.registry {
        Some(path) => Registry::from_toml_file(path)?,
        None => Registry::new(),
    };

    let json = cli.json;
    match cli.command {
        Command::Exec(exec_cli) => run_exec(exec_cli, json, &config, &registry),
        Command::Update(update_cli) => run_update(update_cli, json, &config, &registry),
    }
}

fn run_exec(
    cli: ExecCli,
    json: bool,
    config: &SvnConfig,
    registry: &Registry,
) -> Result<(), SvnError> {
    let target = registry.resolve(&cli.target)?;
    let options = SvnOptions {
        args: cli.args,
        depth: cli.depth,
        msg: cli.message,
        user: cli.username,
        password: cli.password,
        verbose: cli.verbose,
        dryrun: cli.dry_run,
        ..Default::default()
    };

    let mut sink = Transcript::new();
    // Under --report a failure is already the transcript's story and the
    // process exits zero; otherwise the real status becomes the exit code.
    let status = if cli.report {
        crate::core::classify::exec_reported_typed(
            &cli.subcommand,
            &target,
            &mut sink,
            &options,
            config,
        )?
    } else {
        exec_typed(&cli.subcommand, &target, &mut sink, &options, config)?
    };

    print_transcript(&sink, json);

    if !cli.report {
        match status {
            Some(0) => {}
            Some(code) => {
                eprintln!("{} svn exited with status {code}", "error:".red().bold());
                std::process::exit(code);
            }
            None => {
                eprintln!("{} svn terminated without an exit status", "error:".red().bold());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn run_update(
    cli: UpdateCli,
    json: bool,
    config: &SvnConfig,
    registry: &Registry,
) -> Result<(), SvnError> {
    let target = registry.resolve(&cli.target)?;
    let credential = Credential::resolve(
        None,
        None,
        cli.username.as_deref(),
        cli.password.as_deref(),
    );
    let options = UpdateOptions {
        dryrun: cli.dry_run,
        verbose: cli.verbose,
        initial_contents: None,
    };

    let appended = cli.append;
    let mut sink = Transcript::new();
    let status = update(
        &target,
        &cli.message,
        credential,
        Some(&mut sink),
        &options,
        config,
        move |_workdir, contents| {
            let mut updated = contents.to_string();
            for line in &appended {
                updated.push_str(line);
                updated.push('\n');
            }
            updated
        },
    )?;

    print_transcript(&sink, json);

    match status {
        Some(0) => Ok(()),
        Some(code) => {
            eprintln!("{} update failed with status {code}", "error:".red().bold());
            std::process::exit(code);
        }
        None => {
            eprintln!(
                "{} update terminated without an exit status",
                "error:".red().bold()
            );
            std::process::exit(1);
        }
    }
}

fn print_transcript(sink: &Transcript, json: bool) {
    if json {
        println!("{}", sink.to_json());
        return;
    }
    for line in sink.lines() {
        println!("{line}");
    }
}
