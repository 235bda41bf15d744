//! Credential resolution for svn invocations.
//!
//! Authentication material can arrive from three competing sources; exactly
//! one wins per invocation, by fixed precedence:
//! explicit pairs > bound environment pair > user/password fields.
//! A user without a password (or vice versa) never activates anything.

use serde::{Deserialize, Serialize};

use crate::core::command::{Arg, SpawnConfig};

/// A user/secret pair supplied as a unit, e.g. from process context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvPair {
    pub user: String,
    pub password: String,
}

impl EnvPair {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credential {
    #[default]
    None,
    /// Pre-authenticated pairs passed through verbatim as an opaque block.
    ExplicitPairs(Vec<(String, String)>),
    EnvironmentPair(EnvPair),
    UserPassword { user: String, password: String },
}

/// Flag fragments a resolved credential contributes to the argument vector.
///
/// `head` lands immediately after the subcommand; `tail` lands after the
/// `--non-interactive` flag. The secret rides in `spawn.stdin` when the
/// tool supports stdin delivery, inline in `tail` otherwise.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CredentialFragments {
    pub head: Vec<Arg>,
    pub tail: Vec<Arg>,
    pub spawn: SpawnConfig,
}

impl Credential {
    /// Select the active credential source by precedence. Pure.
    pub fn resolve(
        explicit: Option<Vec<(String, String)>>,
        env: Option<EnvPair>,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Credential {
        if let Some(pairs) = explicit {
            return Credential::ExplicitPairs(pairs);
        }
        if let Some(pair) = env {
            return Credential::EnvironmentPair(pair);
        }
        match (user, password) {
            (Some(user), Some(password)) => Credential::UserPassword {
                user: user.to_string(),
                password: password.to_string(),
            },
            // One field alone is equivalent to no credential at all.
            _ => Credential::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Credential::None)
    }

    /// Emit the flag fragments for the command builder.
    ///
    /// `password_from_stdin` reflects the tool/platform capability; when
    /// false the secret degrades to an inline `--password` argument (a
    /// compatibility fallback, explicitly weaker than stdin delivery).
    pub fn fragments(&self, password_from_stdin: bool) -> CredentialFragments {
        match self {
            Credential::None => CredentialFragments::default(),
            Credential::ExplicitPairs(pairs) => CredentialFragments {
                head: vec![
                    Arg::AuthPairs(pairs.clone()),
                    Arg::token("--no-auth-cache"),
                ],
                tail: Vec::new(),
                spawn: SpawnConfig::default(),
            },
            Credential::EnvironmentPair(EnvPair { user, password })
            | Credential::UserPassword { user, password } => {
                let username_group = Arg::Group(vec![
                    "--username".to_string(),
                    user.clone(),
                    "--no-auth-cache".to_string(),
                ]);
                let (secret_group, spawn) = if password_from_stdin {
                    (
                        Arg::Group(vec!["--password-from-stdin".to_string()]),
                        SpawnConfig {
                            stdin: Some(password.clone()),
                        },
                    )
                } else {
                    (
                        Arg::Group(vec!["--password".to_string(), password.clone()]),
                        SpawnConfig::default(),
                    )
                };
                CredentialFragments {
                    head: Vec::new(),
                    tail: vec![username_group, secret_group],
                    spawn,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_pairs_win_over_everything() {
        let credential = Credential::resolve(
            Some(vec![("a".into(), "b".into())]),
            Some(EnvPair::new("c", "d")),
            Some("user"),
            Some("pass"),
        );
        assert_eq!(
            credential,
            Credential::ExplicitPairs(vec![("a".into(), "b".into())])
        );
    }

    #[test]
    fn environment_pair_overrides_user_password() {
        let credential =
            Credential::resolve(None, Some(EnvPair::new("a", "b")), Some("user"), Some("pass"));
        assert_eq!(credential, Credential::EnvironmentPair(EnvPair::new("a", "b")));
    }

    #[test]
    fn user_without_password_is_no_credential() {
        assert!(Credential::resolve(None, None, Some("user"), None).is_none());
        assert!(Credential::resolve(None, None, None, Some("pass")).is_none());
    }

    #[test]
    fn stdin_capable_secret_rides_spawn_config() {
        let credential = Credential::resolve(None, None, Some("user"), Some("pass"));
        let fragments = credential.fragments(true);
        assert_eq!(fragments.spawn.stdin.as_deref(), Some("pass"));
        assert_eq!(
            fragments.tail[1],
            Arg::Group(vec!["--password-from-stdin".to_string()])
        );
    }

    #[test]
    fn stdin_incapable_secret_falls_back_inline() {
        let credential = Credential::resolve(None, None, Some("user"), Some("pass"));
        let fragments = credential.fragments(false);
        assert_eq!(fragments.spawn.stdin, None);
        assert_eq!(
            fragments.tail[1],
            Arg::Group(vec!["--password".to_string(), "pass".to_string()])
        );
    }
}
