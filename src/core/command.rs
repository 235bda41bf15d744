//! Argument-vector assembly for svn invocations.
//!
//! The builder validates caller options, resolves the active credential,
//! and produces a fixed-order vector. The order is a contract: two option
//! sets that are semantically equivalent (`depth: "empty"` vs
//! `args: ["--depth", "empty"]`) must render byte-identically.

use std::path::PathBuf;

use serde_json::Value;

use crate::core::credentials::{Credential, CredentialFragments, EnvPair};
use crate::core::error::SvnError;

/// One element of the argument vector.
///
/// Credential-bearing elements keep their grouping so transcript renderings
/// show nested sub-sequences rather than a flat token soup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Token(String),
    Group(Vec<String>),
    /// Opaque pre-authenticated block, passed through verbatim.
    AuthPairs(Vec<(String, String)>),
}

impl Arg {
    pub fn token(text: impl Into<String>) -> Self {
        Arg::Token(text.into())
    }

    fn to_value(&self) -> Value {
        match self {
            Arg::Token(token) => Value::String(token.clone()),
            Arg::Group(group) => Value::Array(
                group.iter().cloned().map(Value::String).collect(),
            ),
            Arg::AuthPairs(pairs) => Value::Array(
                pairs
                    .iter()
                    .map(|(user, password)| {
                        Value::Array(vec![
                            Value::String(user.clone()),
                            Value::String(password.clone()),
                        ])
                    })
                    .collect(),
            ),
        }
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Arg::Token(token) => out.push(token.clone()),
            Arg::Group(group) => out.extend(group.iter().cloned()),
            Arg::AuthPairs(pairs) => {
                for (user, password) in pairs {
                    out.push(user.clone());
                    out.push(password.clone());
                }
            }
        }
    }
}

/// Subprocess spawn configuration alongside the vector. Currently only a
/// piped stdin payload for stdin-delivered secrets.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpawnConfig {
    pub stdin: Option<String>,
}

impl SpawnConfig {
    fn to_value(&self) -> Value {
        match &self.stdin {
            Some(payload) => serde_json::json!({ "stdin": payload }),
            None => serde_json::json!({}),
        }
    }
}

/// Injected tool configuration: where the svn binary lives and whether it
/// accepts `--password-from-stdin` (svn >= 1.10 on non-Windows platforms).
#[derive(Debug, Clone)]
pub struct SvnConfig {
    pub binary: PathBuf,
    pub password_from_stdin: bool,
}

impl Default for SvnConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("svn"),
            password_from_stdin: cfg!(not(windows)),
        }
    }
}

impl SvnConfig {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }
}

/// Every recognized invocation option, enumerated at compile time.
///
/// The legacy surface validated an option hash at runtime; unknown-key
/// detection now happens in [`SvnOptions::from_value`], which preserves the
/// exact caller-facing messages.
#[derive(Debug, Default, Clone)]
pub struct SvnOptions {
    pub args: Vec<String>,
    pub depth: Option<String>,
    pub msg: Option<String>,
    pub auth: Option<Vec<(String, String)>>,
    pub env: Option<EnvPair>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub verbose: bool,
    pub dryrun: bool,
}

const RECOGNIZED_KEYS: &[&str] = &[
    "args", "depth", "msg", "auth", "env", "user", "password", "verbose", "dryrun",
];

impl SvnOptions {
    /// Decode options from an untyped map, with the legacy error messages.
    pub fn from_value(value: &Value) -> Result<Self, SvnError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(SvnError::validation(format!(
                    "options '{other}' must be a map"
                )))
            }
        };

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| !RECOGNIZED_KEYS.contains(&key.as_str()))
            .map(|key| format!(":{key}"))
            .collect();
        if !unknown.is_empty() {
            return Err(SvnError::validation(format!(
                "Following options not recognised: [{}]",
                unknown.join(", ")
            )));
        }

        let mut options = Self::default();

        if let Some(args) = map.get("args") {
            options.args = match args {
                Value::String(arg) => vec![arg.clone()],
                Value::Array(items) => {
                    let mut collected = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            Value::String(arg) => collected.push(arg.clone()),
                            _ => return Err(Self::bad_args(args)),
                        }
                    }
                    collected
                }
                other => return Err(Self::bad_args(other)),
            };
        }

        options.depth = Self::string_field(map.get("depth"), "depth")?;
        options.msg = Self::string_field(map.get("msg"), "msg")?;
        options.user = Self::string_field(map.get("user"), "user")?;
        options.password = Self::string_field(map.get("password"), "password")?;

        if let Some(auth) = map.get("auth") {
            options.auth = Some(Self::auth_pairs(auth)?);
        }
        if let Some(env) = map.get("env") {
            let pair: EnvPair = serde_json::from_value(env.clone()).map_err(|_| {
                SvnError::validation(format!(
                    "env '{env}' must be a map with user and password"
                ))
            })?;
            options.env = Some(pair);
        }

        options.verbose = Self::bool_field(map.get("verbose"), "verbose")?;
        options.dryrun = Self::bool_field(map.get("dryrun"), "dryrun")?;

        Ok(options)
    }

    fn bad_args(value: &Value) -> SvnError {
        let rendered = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        SvnError::validation(format!("args '{rendered}' must be string or array"))
    }

    fn string_field(value: Option<&Value>, key: &str) -> Result<Option<String>, SvnError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(other) => Err(SvnError::validation(format!(
                "{key} '{other}' must be a string"
            ))),
        }
    }

    fn bool_field(value: Option<&Value>, key: &str) -> Result<bool, SvnError> {
        match value {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(SvnError::validation(format!(
                "{key} '{other}' must be a boolean"
            ))),
        }
    }

    fn auth_pairs(value: &Value) -> Result<Vec<(String, String)>, SvnError> {
        let bad = || {
            SvnError::validation(format!(
                "auth '{value}' must be an array of [user, password] pairs"
            ))
        };
        let items = value.as_array().ok_or_else(bad)?;
        let mut pairs = Vec::with_capacity(items.len());
        for item in items {
            let pair = item.as_array().ok_or_else(bad)?;
            if pair.len() != 2 {
                return Err(bad());
            }
            let user = pair[0].as_str().ok_or_else(bad)?;
            let password = pair[1].as_str().ok_or_else(bad)?;
            pairs.push((user.to_string(), password.to_string()));
        }
        Ok(pairs)
    }

    /// The active credential for these options, by precedence.
    pub fn credential(&self) -> Credential {
        Credential::resolve(
            self.auth.clone(),
            self.env.clone(),
            self.user.as_deref(),
            self.password.as_deref(),
        )
    }

    /// Replace the credential fields with a pre-resolved credential.
    pub fn with_credential(mut self, credential: &Credential) -> Self {
        self.auth = None;
        self.env = None;
        self.user = None;
        self.password = None;
        match credential {
            Credential::None => {}
            Credential::ExplicitPairs(pairs) => self.auth = Some(pairs.clone()),
            Credential::EnvironmentPair(pair) => self.env = Some(pair.clone()),
            Credential::UserPassword { user, password } => {
                self.user = Some(user.clone());
                self.password = Some(password.clone());
            }
        }
        self
    }

    /// Extra literal arguments, with the `depth`/`msg` shorthands expanded.
    fn extra_args(&self) -> Vec<String> {
        let mut extra = self.args.clone();
        if let Some(depth) = &self.depth {
            extra.push("--depth".to_string());
            extra.push(depth.clone());
        }
        if let Some(msg) = &self.msg {
            extra.push("--message".to_string());
            extra.push(msg.clone());
        }
        extra
    }
}

/// A fully assembled invocation: the definitive argument vector plus the
/// spawn configuration, ready for the process runner.
#[derive(Debug, Clone)]
pub struct SvnCommand {
    subcommand: String,
    target: String,
    destination: Option<String>,
    fragments: CredentialFragments,
    extra: Vec<String>,
    verbose: bool,
    dry_run: bool,
}

impl SvnCommand {
    pub fn build(
        subcommand: &str,
        target: &str,
        options: &SvnOptions,
        config: &SvnConfig,
    ) -> Result<Self, SvnError> {
        Self::build_with_destination(subcommand, target, None, options, config)
    }

    /// Like [`SvnCommand::build`], with an extra positional destination
    /// after the target (`svn checkout -- URL DIR`).
    pub(crate) fn build_with_destination(
        subcommand: &str,
        target: &str,
        destination: Option<&str>,
        options: &SvnOptions,
        config: &SvnConfig,
    ) -> Result<Self, SvnError> {
        let credential = options.credential();
        Ok(Self {
            subcommand: subcommand.to_string(),
            target: target.to_string(),
            destination: destination.map(str::to_string),
            fragments: credential.fragments(config.password_from_stdin),
            extra: options.extra_args(),
            verbose: options.verbose,
            dry_run: options.dryrun,
        })
    }

    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn spawn_config(&self) -> &SpawnConfig {
        &self.fragments.spawn
    }

    /// The vector in its fixed assembly order. When `include_credentials`
    /// is false the credential-bearing fragments are left out; executed
    /// commands always include them, transcript echoes only under
    /// `verbose`.
    pub fn vector(&self, include_credentials: bool) -> Vec<Arg> {
        let mut vector = vec![Arg::token("svn"), Arg::token(&self.subcommand)];
        if include_credentials {
            vector.extend(self.fragments.head.iter().cloned());
        }
        vector.push(Arg::token("--non-interactive"));
        if include_credentials {
            vector.extend(self.fragments.tail.iter().cloned());
        }
        vector.extend(self.extra.iter().map(Arg::token));
        vector.push(Arg::token("--"));
        vector.push(Arg::token(&self.target));
        if let Some(destination) = &self.destination {
            vector.push(Arg::token(destination));
        }
        vector
    }

    /// Flattened argument list for the subprocess, excluding the leading
    /// tool name (the runner supplies the binary path itself).
    pub fn spawn_args(&self) -> Vec<String> {
        let mut flat = Vec::new();
        for arg in self.vector(true).into_iter().skip(1) {
            arg.flatten_into(&mut flat);
        }
        flat
    }

    /// Stable textual rendering of the `[vector, spawn-config]` pair.
    ///
    /// This is the dry-run transcript line (index 1, after the echo line).
    /// Credential-bearing fragments and the stdin payload appear only under
    /// `verbose`; the invocation itself always runs with them.
    pub fn rendering(&self) -> String {
        let vector = Value::Array(
            self.vector(self.verbose)
                .iter()
                .map(Arg::to_value)
                .collect(),
        );
        let spawn = if self.verbose {
            self.fragments.spawn.to_value()
        } else {
            serde_json::json!({})
        };
        Value::Array(vec![vector, spawn]).to_string()
    }

    /// The shell-style echo written as the first transcript line.
    pub fn echo_line(&self) -> String {
        let mut flat = Vec::new();
        for arg in self.vector(self.verbose) {
            arg.flatten_into(&mut flat);
        }
        format!("$ {}", flat.join(" "))
    }
}
